// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Contains implementations for each [Insn]
//!
//! Every instruction is followed by an unconditional `pc += 1`,
//! so anything that writes the program counter lands one word short of its target.

use super::{alu::Funct, *};

impl CPU {
    /// Executes a single [Insn]
    #[rustfmt::skip]
    #[inline(always)]
    pub(super) fn execute(&mut self, bus: &mut Bus, instruction: Insn, sink: &mut impl PixelSink) {
        match instruction {
            Insn::alu  { f, d, s, t } => self.alu(f, d, s, t),
            Insn::lw   { t, s, i    } => self.load_word(bus, t, s, i),
            Insn::sw   { t, s, i    } => self.store_word(bus, t, s, i),
            Insn::beq  { t, s, i    } => self.branch_equal(s, t, i),
            Insn::j    {          a } => self.jump(a),
            Insn::addi { t, s, i    } => self.add_immediate(t, s, i),
            Insn::bne  { t, s, i    } => self.branch_not_equal(s, t, i),
            Insn::jr   {    s       } => self.jump_register(s),
            Insn::jal  {          a } => self.jump_and_link(a),
            Insn::display             => self.display(bus, sink),
        }
    }
}

/// Computes `base + offset` in the unified address space.
///
/// Returns [None] for negative addresses.
#[inline(always)]
fn effective_address(base: i16, offset: i16) -> Option<u16> {
    u16::try_from(base as i32 + offset as i32).ok()
}

/// |`0`| Performs ALU operation
///
/// |funct| effect                  |
/// |-----|-------------------------|
/// | `0` | Rd = Rs & Rt            |
/// | `1` | Rd = Rs \| Rt           |
/// | `2` | Rd = Rs + Rt            |
/// | `6` | Rd = Rs - Rt            |
/// | `7` | Rd = Rs < Rt            |
impl CPU {
    /// |`0`| Writes the result of an ALU operation on Rs and Rt to Rd
    #[inline(always)]
    pub(super) fn alu(&mut self, f: Funct, d: Reg, s: Reg, t: Reg) {
        self.r[d] = f.apply(self.r[s], self.r[t]);
    }
}

/// |`1`, `2`| Memory access
///
/// Addresses are Rs plus the sign-extended immediate.
impl CPU {
    /// |`1`| Loads a word into Rt.
    ///
    /// Negative addresses load 0. Addresses above the keyboard leave Rt as it was.
    #[inline(always)]
    pub(super) fn load_word(&mut self, bus: &Bus, t: Reg, s: Reg, i: i16) {
        match effective_address(self.r[s], i) {
            Some(addr) => {
                if let Some(word) = bus.read(addr) {
                    self.r[t] = word;
                }
            }
            None => self.r[t] = 0,
        }
    }
    /// |`2`| Stores Rt. Stores to the keyboard or unmapped addresses do nothing.
    #[inline(always)]
    pub(super) fn store_word(&mut self, bus: &mut Bus, t: Reg, s: Reg, i: i16) {
        if let Some(addr) = effective_address(self.r[s], i) {
            bus.write(addr, self.r[t]);
        }
    }
}

/// |`3`, `6`| Branches
///
/// The offset is relative to the branch itself, and the trailing increment still applies:
/// a taken branch by `i` lands at `pc + i + 1`.
impl CPU {
    /// |`3`| Branches if Rs == Rt
    #[inline(always)]
    pub(super) fn branch_equal(&mut self, s: Reg, t: Reg, i: i16) {
        if self.r[s] == self.r[t] {
            self.pc = self.pc.wrapping_add_signed(i);
        }
    }
    /// |`6`| Branches if Rs != Rt
    #[inline(always)]
    pub(super) fn branch_not_equal(&mut self, s: Reg, t: Reg, i: i16) {
        if self.r[s] != self.r[t] {
            self.pc = self.pc.wrapping_add_signed(i);
        }
    }
}

/// |`4`, `7`, `8`| Jumps
impl CPU {
    /// |`4`| Replaces the low 12 bits of pc
    #[inline(always)]
    pub(super) fn jump(&mut self, a: u16) {
        self.pc = ((self.pc & 0xf000) | a).wrapping_sub(1);
    }
    /// |`7`| Sets pc to Rs. Execution continues at Rs + 1.
    #[inline(always)]
    pub(super) fn jump_register(&mut self, s: Reg) {
        self.pc = self.r[s] as u16;
    }
    /// |`8`| Stores pc in the link register, then jumps
    #[inline(always)]
    pub(super) fn jump_and_link(&mut self, a: u16) {
        self.r[LINK] = self.pc as i16;
        self.jump(a);
    }
}

/// |`5`| Adds a sign-extended immediate
impl CPU {
    /// |`5`| Rt = Rs + i
    #[inline(always)]
    pub(super) fn add_immediate(&mut self, t: Reg, s: Reg, i: i16) {
        self.r[t] = self.r[s].wrapping_add(i);
    }
}

/// |`F`| Repaints the screen
impl CPU {
    /// |`F`| Reports every pixel written since the last display
    #[inline(always)]
    pub(super) fn display(&mut self, bus: &mut Bus, sink: &mut impl PixelSink) {
        bus.flush(sink);
    }
}
