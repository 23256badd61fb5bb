// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Prints the listing of a ROM image, up to its first halt

use emu16::{cpu::instruction::disassembler::listing, error::Result, image::load_image, prelude::*};
use gumdrop::*;
use owo_colors::OwoColorize;
use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Options, Hash)]
struct Arguments {
    #[options(help = "Show help text")]
    help: bool,
    #[options(help = "Load a ROM image (Logisim v2.0 raw) to disassemble", free, required)]
    pub file: PathBuf,
    #[options(help = "Start disassembling at word offset...", parse(try_from_str = "parse_hex"))]
    pub offset: u16,
}

fn parse_hex(value: &str) -> std::result::Result<u16, std::num::ParseIntError> {
    u16::from_str_radix(value, 16)
}

fn main() -> Result<()> {
    let options = Arguments::parse_args_default_or_exit();
    let image = load_image(&options.file)?;
    let offset = (options.offset as usize).min(image.len());
    let disassembler = Dis::default();
    for (addr, insn) in listing(&image[offset..]) {
        println!(
            "{:04x}: {} {:04x}",
            addr + offset,
            disassembler.once(insn),
            insn.bright_black(),
        );
    }
    Ok(())
}
