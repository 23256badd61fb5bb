// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! emu16: runs a 16-bit program in a window

mod error;
mod ui;

use emu16::{image::load_image, prelude::*};
use error::Result;
use gumdrop::*;
use owo_colors::OwoColorize;
use std::{
    path::PathBuf,
    time::{Duration, Instant},
};
use ui::*;

pub fn main() -> Result<()> {
    let options = Arguments::parse_args_default_or_exit();
    let state = Session::new(options)?;
    for result in state {
        if let Err(e) = result {
            eprintln!("{}", e.bold().red());
            break;
        }
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Options, Hash)]
struct Arguments {
    #[options(help = "Load a ROM image (Logisim v2.0 raw) to run.", required, free)]
    pub file: PathBuf,
    #[options(help = "Print this help message.")]
    help: bool,
    #[options(help = "Load a RAM image (Logisim v2.0 raw).", meta = "FILE")]
    pub ram: Option<PathBuf>,
    #[options(help = "Enable debug mode at startup.")]
    pub debug: bool,
    #[options(help = "Start running immediately.")]
    pub run: bool,

    #[options(help = "Set the instruction rate, like 8192 or 8k.", meta = "HZ")]
    pub frequency: Option<Frequency>,
    #[options(help = "Run a fixed number of instructions per frame, ignoring the clock.")]
    pub monotonic: Option<usize>,

    #[options(help = "Set the target framerate.", default = "60", meta = "FR")]
    pub frame_rate: u64,
}

#[derive(Debug)]
struct Session {
    pub rate: u64,
    pub emu: Emulator,
    pub ui: UI,
    pub ft: Instant,
}

impl Session {
    fn new(options: Arguments) -> Result<Self> {
        let mut emu = Emulator::new(
            CPU::new(
                Dis::default(),
                Flags {
                    debug: options.debug,
                    frequency: options.frequency.unwrap_or_default(),
                    monotonic: options.monotonic,
                },
            ),
            Bus::default(),
        );
        emu.load(Rom, &load_image(&options.file)?)?;
        if let Some(ram) = &options.ram {
            emu.load(Ram, &load_image(ram)?)?;
        }
        if options.run {
            emu.start();
        }
        Ok(Session {
            rate: options.frame_rate.max(1),
            emu,
            ui: UIBuilder::new(&options.file).build()?,
            ft: Instant::now(),
        })
    }
    fn keys(&mut self) -> Result<bool> {
        self.ui.keys(&mut self.emu)
    }
    fn frame(&mut self) -> Result<bool> {
        self.ui.frame(&mut self.emu)
    }
    /// Faults are reported, but leave the window open for inspection
    fn tick(&mut self) {
        if let Err(e) = self.emu.tick(Instant::now(), self.ui.framebuffer()) {
            eprintln!("{}", e.bold().red());
        }
    }
    fn wait_for_next_frame(&mut self) {
        let rate = Duration::from_nanos(1_000_000_000 / self.rate + 1);
        std::thread::sleep(rate.saturating_sub(self.ft.elapsed()));
        self.ft += rate;
    }
}

impl Iterator for Session {
    type Item = Result<()>;

    fn next(&mut self) -> Option<Self::Item> {
        self.wait_for_next_frame();
        match self.keys() {
            Ok(opt) if !opt => return None,
            Err(e) => return Some(Err(e)),
            _ => (),
        }
        self.tick();
        match self.frame() {
            Ok(opt) if !opt => return None,
            Err(e) => return Some(Err(e)),
            _ => (),
        }
        Some(Ok(()))
    }
}
