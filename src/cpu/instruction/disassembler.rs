// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! A disassembler for emu16 instruction words
use super::{Instruction, Insn, HALT};
use crate::error::Error;
use owo_colors::{OwoColorize, Style};

/// Disassembles instruction words
pub trait Disassembler {
    /// Disassemble a single instruction
    fn once(&self, insn: u16) -> String;
}

/// Disassembles instruction words, printing them in the provided [owo_colors::Style]s
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dis {
    /// Styles invalid instructions
    pub invalid: Style,
    /// Styles valid instructions
    pub normal: Style,
}

impl Default for Dis {
    fn default() -> Self {
        Self {
            invalid: Style::new().bold().red(),
            normal: Style::new().green(),
        }
    }
}

impl Disassembler for Dis {
    fn once(&self, insn: u16) -> String {
        match describe(insn) {
            Ok(text) => format!("{}", text.style(self.normal)),
            Err(text) => format!("{}", text.style(self.invalid)),
        }
    }
}

/// Disassembles a word without styling.
///
/// Words which can't be executed are described in the [Err] variant.
/// # Examples
/// ```rust
/// # use emu16::cpu::instruction::disassembler::describe;
/// assert_eq!(describe(0x5045), Ok("addi R1, R0, 5".into()));
/// assert_eq!(describe(0x0000), Ok("halt".into()));
/// assert_eq!(describe(0x9000), Err("Invalid op: 9".into()));
/// ```
pub fn describe(insn: u16) -> Result<String, String> {
    if insn == HALT {
        return Ok("halt".into());
    }
    match Insn::decode(insn) {
        Ok(insn) => Ok(insn.to_string()),
        Err(Error::InvalidAluFunction { funct }) => Err(format!("Invalid ALU funct: {funct:X}")),
        Err(_) => Err(format!("Invalid op: {:X}", Instruction::decode(insn).op)),
    }
}

/// Walks a program image up to and including its first halt
/// # Examples
/// ```rust
/// # use emu16::cpu::instruction::disassembler::listing;
/// let rom = [0x5045, 0x0000, 0x5083];
/// assert_eq!(listing(&rom).collect::<Vec<_>>(), [(0, 0x5045), (1, 0x0000)]);
/// ```
pub fn listing(rom: &[u16]) -> impl Iterator<Item = (usize, u16)> + '_ {
    rom.iter()
        .copied()
        .enumerate()
        .scan(false, |halted, (addr, word)| {
            if *halted {
                return None;
            }
            *halted = word == HALT;
            Some((addr, word))
        })
}
