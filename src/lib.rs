// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE.txt for details)

//! This crate implements an emulator for a small 16-bit teaching architecture:
//! eight registers, a word-addressed ROM, a RAM, a memory-mapped 128x64 screen,
//! and a single keyboard register.
//!
//! The host owns the clock. Call [Emulator::tick] with the current time once per
//! frame, and the emulator runs however many instructions are due at the chosen
//! [Frequency](cpu::Frequency).

pub mod bus;
pub mod cpu;
pub mod error;
pub mod image;
pub mod screen;

use bus::{Bus, Region};
use cpu::{Frequency, State, CPU};
use error::Result;
use screen::PixelSink;
use std::time::Instant;

/// Owns everything a running program can see.
///
/// Every mutation bumps the [revision](Emulator::revision), so observers can
/// poll for changes instead of being called back.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Emulator {
    pub cpu: CPU,
    pub bus: Bus,
    revision: u64,
}

impl Emulator {
    /// Constructs a new Emulator from a [CPU] and a [Bus]
    pub fn new(cpu: CPU, bus: Bus) -> Self {
        Self {
            cpu,
            bus,
            revision: 0,
        }
    }

    /// Gets the revision counter, which changes whenever observable state does
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Gets the run [State]
    pub fn state(&self) -> State {
        self.cpu.state()
    }

    /// Loads an image into the start of [Region::Rom] or [Region::Ram]
    /// # Examples
    /// ```rust
    /// # use emu16::prelude::*;
    /// let mut emu = Emulator::default();
    /// emu.load(Rom, &[0x5045, 0x0000]).unwrap();
    /// assert_eq!(emu.revision(), 1);
    /// emu.load(Ram, &vec![0; 0x4001]).expect_err("RAM holds 0x4000 words");
    /// assert_eq!(emu.revision(), 1);
    /// ```
    pub fn load(&mut self, region: Region, image: &[u16]) -> Result<()> {
        self.bus.load_region(region, image)?;
        self.touch();
        Ok(())
    }

    /// Sets one word of [Region::Rom] or [Region::Ram]
    pub fn set_cell(&mut self, region: Region, index: usize, value: u16) -> Result<()> {
        self.bus.set_cell(region, index, value)?;
        self.touch();
        Ok(())
    }

    /// Applies a hexadecimal edit to one word of [Region::Rom] or [Region::Ram].
    ///
    /// Edits which don't parse, or which don't land in the region, are ignored.
    /// Returns whether the edit was applied.
    /// # Examples
    /// ```rust
    /// # use emu16::prelude::*;
    /// let mut emu = Emulator::default();
    /// assert!(emu.edit_cell(Ram, 2, "beef"));
    /// assert!(!emu.edit_cell(Ram, 3, "NaN"));
    /// assert_eq!(&emu.bus.ram()[2..4], &[0xbeef_u16 as i16, 0]);
    /// ```
    pub fn edit_cell(&mut self, region: Region, index: usize, text: &str) -> bool {
        image::parse_word(text)
            .and_then(|value| self.set_cell(region, index, value))
            .is_ok()
    }

    /// Sets a general purpose register
    pub fn set_reg(&mut self, reg: usize, value: i16) -> Result<()> {
        self.cpu.set_reg(reg, value)?;
        self.touch();
        Ok(())
    }

    /// Sets the keyboard register to the currently held key (0 for none)
    pub fn set_keyboard(&mut self, code: u16) {
        if self.bus.keyboard() != code {
            self.bus.set_keyboard(code);
            self.touch();
        }
    }

    /// Gets the target [Frequency]
    pub fn frequency(&self) -> Frequency {
        self.cpu.flags.frequency
    }

    /// Sets the target [Frequency]. Rates outside the standard set are kept as given.
    pub fn set_frequency(&mut self, frequency: Frequency) {
        self.cpu.flags.frequency = frequency;
        self.touch();
    }

    /// Starts running on the next [tick](Emulator::tick)
    pub fn start(&mut self) {
        self.cpu.start();
        self.touch();
    }

    /// Stops running
    pub fn stop(&mut self) {
        self.cpu.stop();
        self.touch();
    }

    /// Resets the CPU and clears RAM.
    ///
    /// ROM, the screen, and the keyboard are kept.
    /// # Examples
    /// ```rust
    /// # use emu16::prelude::*;
    /// let mut emu = Emulator::new(CPU::default(), bus! { Rom = &[0x5045], Ram = &[7] });
    /// emu.step(&mut ()).unwrap();
    /// emu.reset();
    /// assert_eq!(emu.bus.ram()[0], 0);
    /// assert_eq!(emu.bus.rom()[0], 0x5045);
    /// assert_eq!(emu.cpu.regs()[1], 0);
    /// ```
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.bus.clear_region(Region::Ram);
        self.touch();
    }

    /// Executes exactly one instruction, whatever the run state
    pub fn step(&mut self, sink: &mut impl PixelSink) -> Result<State> {
        let result = self.cpu.singlestep(&mut self.bus, sink);
        self.touch();
        result
    }

    /// Runs the instructions due at `now`, if running.
    ///
    /// Returns the number of instructions retired.
    /// # Examples
    /// ```rust
    /// # use emu16::prelude::*;
    /// # use std::time::Instant;
    /// let mut emu = Emulator::default();
    /// emu.cpu.flags.monotonic = Some(16);
    /// emu.load(Rom, &[0x5241, 0x4000]).unwrap(); // addi R1, R1, 1; j 0
    /// emu.start();
    /// let revision = emu.revision();
    /// assert_eq!(emu.tick(Instant::now(), &mut ()).unwrap(), 16);
    /// assert!(emu.revision() > revision);
    /// ```
    pub fn tick(&mut self, now: Instant, sink: &mut impl PixelSink) -> Result<usize> {
        let state = self.cpu.state();
        let result = self.cpu.tick(&mut self.bus, now, sink);
        if !matches!(result, Ok(0)) || state != self.cpu.state() {
            self.touch();
        }
        result
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

/// Common imports for emu16
pub mod prelude {
    pub use super::Emulator;
    use super::*;
    pub use crate::bus;
    pub use bus::{Bus, Region::*};
    pub use cpu::{Dis, Disassembler, Flags, Frequency, State, CPU};
    pub use error::Result;
    pub use screen::{FrameBuffer, Pixel, PixelSink};
}
