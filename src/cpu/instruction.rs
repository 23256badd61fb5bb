// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Contains the definition of an [Instruction] and its executable form, [Insn]
//!
//! ```text
//!  15   12 11  9 8   6 5   3 2   0
//! +-------+-----+-----+-----+-----+
//! |  op   | rs  | rt  | rd  |funct|
//! +-------+-----+-----+-----------+
//! |  op   | rs  | rt  | immediate |
//! +-------+-----+-----+-----------+
//! |  op   |        address        |
//! +-------+-----------------------+
//! ```

pub mod disassembler;

use super::alu::Funct;
use crate::error::{Error, Result};
use std::fmt::Display;

/// The all-zero word, which stops execution instead of being decoded
pub const HALT: u16 = 0x0000;

/// Sign-extends a 6-bit immediate, treating bit 5 as the sign
/// # Examples
/// ```rust
/// # use emu16::cpu::instruction::sign_extend;
/// assert_eq!(sign_extend(0x1f), 31);
/// assert_eq!(sign_extend(0x20), -32);
/// assert_eq!(sign_extend(0x3f), -1);
/// ```
pub fn sign_extend(value: u8) -> i16 {
    let value = (value & 0x3f) as i16;
    if value & 0x20 != 0 {
        value - 0x40
    } else {
        value
    }
}

/// Every field of an instruction word. Each opcode only looks at some of them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Instruction {
    /// Bits 15-12
    pub op: u8,
    /// Bits 11-9
    pub rs: usize,
    /// Bits 8-6
    pub rt: usize,
    /// Bits 5-3
    pub rd: usize,
    /// Bits 2-0
    pub funct: u8,
    /// Bits 5-0
    pub immediate: u8,
    /// Bits 11-0
    pub address: u16,
}

impl Instruction {
    /// Splits a word into its fields
    /// # Examples
    /// ```rust
    /// # use emu16::cpu::instruction::Instruction;
    /// let insn = Instruction::decode(0x029a); // add R3, R1, R2
    /// assert_eq!((insn.op, insn.rs, insn.rt, insn.rd, insn.funct), (0, 1, 2, 3, 2));
    /// ```
    pub fn decode(word: u16) -> Self {
        Self {
            op: ((word & 0b1111_000_000_000_000) >> 12) as u8,
            rs: ((word & 0b0000_111_000_000_000) >> 9) as usize,
            rt: ((word & 0b0000_000_111_000_000) >> 6) as usize,
            rd: ((word & 0b0000_000_000_111_000) >> 3) as usize,
            funct: (word & 0b0000_000_000_000_111) as u8,
            immediate: (word & 0b0000_000_000_111_111) as u8,
            address: word & 0b0000_111_111_111_111,
        }
    }
}

impl From<u16> for Instruction {
    fn from(word: u16) -> Self {
        Self::decode(word)
    }
}

/// An executable instruction.
///
/// Register fields are `s`, `t`, and `d`; `i` is the sign-extended immediate, and `a` the address.
#[allow(non_camel_case_types, missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Insn {
    /// | 0 | Rd = Rs (funct) Rt
    alu { f: Funct, d: usize, s: usize, t: usize },
    /// | 1 | Rt = mem[Rs + i]
    lw { t: usize, s: usize, i: i16 },
    /// | 2 | mem[Rs + i] = Rt
    sw { t: usize, s: usize, i: i16 },
    /// | 3 | Branch by i if Rs == Rt
    beq { t: usize, s: usize, i: i16 },
    /// | 4 | Jump within the current 4K page
    j { a: u16 },
    /// | 5 | Rt = Rs + i
    addi { t: usize, s: usize, i: i16 },
    /// | 6 | Branch by i if Rs != Rt
    bne { t: usize, s: usize, i: i16 },
    /// | 7 | Jump to Rs
    jr { s: usize },
    /// | 8 | R7 = pc, then jump within the current 4K page
    jal { a: u16 },
    /// | F | Repaint the pixels written since the last display
    display,
}

impl Insn {
    /// Decodes a word into an [Insn]
    ///
    /// Returns [Error::InvalidOpcode] or [Error::InvalidAluFunction]
    /// if the word has no meaning.
    /// # Examples
    /// ```rust
    /// # use emu16::cpu::instruction::Insn;
    /// assert_eq!(Insn::decode(0x4abc).unwrap(), Insn::j { a: 0xabc });
    /// Insn::decode(0x9000).expect_err("op 9 is unused");
    /// Insn::decode(0x0003).expect_err("funct 3 is unused");
    /// ```
    pub fn decode(word: u16) -> Result<Self> {
        let Instruction { op, rs: s, rt: t, rd: d, funct, immediate, address: a } =
            Instruction::decode(word);
        let i = sign_extend(immediate);
        Ok(match op {
            0x0 => Insn::alu { f: Funct::try_from(funct)?, d, s, t },
            0x1 => Insn::lw { t, s, i },
            0x2 => Insn::sw { t, s, i },
            0x3 => Insn::beq { t, s, i },
            0x4 => Insn::j { a },
            0x5 => Insn::addi { t, s, i },
            0x6 => Insn::bne { t, s, i },
            0x7 => Insn::jr { s },
            0x8 => Insn::jal { a },
            0xf => Insn::display,
            _ => return Err(Error::InvalidOpcode { word }),
        })
    }
}

impl TryFrom<u16> for Insn {
    type Error = Error;
    fn try_from(word: u16) -> Result<Self> {
        Self::decode(word)
    }
}

impl Display for Insn {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Insn::alu { f: op, d, s, t } => write!(f, "{op} R{d}, R{s}, R{t}"),
            Insn::lw { t, s, i }         => write!(f, "lw R{t}, {i}(R{s})"),
            Insn::sw { t, s, i }         => write!(f, "sw R{t}, {i}(R{s})"),
            Insn::beq { t, s, i }        => write!(f, "beq R{t}, R{s}, {i}"),
            Insn::j { a }                => write!(f, "j {a}"),
            Insn::addi { t, s, i }       => write!(f, "addi R{t}, R{s}, {i}"),
            Insn::bne { t, s, i }        => write!(f, "bne R{t}, R{s}, {i}"),
            Insn::jr { s }               => write!(f, "jr R{s}"),
            Insn::jal { a }              => write!(f, "jal {a}"),
            Insn::display                => write!(f, "display"),
        }
    }
}
