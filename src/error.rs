// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Error type for emu16

use crate::bus::Region;
use thiserror::Error;

/// Result type, equivalent to [std::result::Result]<T, [enum@Error]>
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for emu16.
#[derive(Debug, Error)]
pub enum Error {
    /// The opcode field of an instruction names no operation
    #[error("invalid op: {word:016b}")]
    InvalidOpcode {
        /// The offending word
        word: u16,
    },
    /// The funct field of an ALU instruction names no operation
    #[error("invalid funct: {funct:03b}")]
    InvalidAluFunction {
        /// The offending funct bits
        funct: u8,
    },
    /// Tried to load an image larger than its destination [Region]
    #[error("image of {len} words does not fit in {region} ({capacity} words)")]
    ImageTooLarge {
        /// The destination [Region]
        region: Region,
        /// Length of the rejected image
        len: usize,
        /// Capacity of the destination [Region]
        capacity: usize,
    },
    /// Edit text could not be parsed as a hexadecimal word
    #[error("\"{text}\" is not a hexadecimal word")]
    MalformedEditValue {
        /// The text which failed to become a word
        text: String,
    },
    /// Tried to edit a cell outside of its [Region]
    #[error("index {index:04x} is not present in {region}")]
    InvalidAddress {
        /// The [Region] being edited
        region: Region,
        /// The offending index
        index: usize,
    },
    /// The [Region] does not support the requested operation
    #[error("region {region} cannot be loaded or edited")]
    InvalidRegion {
        /// The offending [Region]
        region: Region,
    },
    /// Tried to get/set an out-of-bounds register
    #[error("tried to access register R{reg} which does not exist")]
    InvalidRegister {
        /// The offending register
        reg: usize,
    },
    /// The program counter left ROM
    #[error("program counter {pc:04x} is outside of ROM")]
    ProgramCounterOutOfRange {
        /// The offending program counter
        pc: u16,
    },
    /// Tried to convert string into a frequency, but it did not match.
    #[error("no suitable conversion of \"{text}\" into Frequency")]
    InvalidFrequency {
        /// The string which failed to become a frequency
        text: String,
    },
    /// Error originated in [std::io]
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}
