// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE.txt for details)

//! The Bus connects the CPU to Memory
//!
//! Every load and store goes through a single 16-bit address space:
//!
//! | address         | region        |
//! |-----------------|---------------|
//! |`0x0000..0x4000` | [Region::Ram] |
//! |`0x4000..0x6000` | [Region::Screen] |
//! |`0x6000`         | [Region::Keyboard] (read-only) |
//! |`0x6001..`       | unmapped      |
//!
//! [Region::Rom] is not addressable by programs; it is only ever fetched from.

use crate::{
    error::{Error, Result},
    screen::{self, PixelSink},
};
use std::fmt::{Display, Formatter};

/// Words of program memory
pub const ROM_WORDS: usize = 0x8000;
/// Words of data memory
pub const RAM_WORDS: usize = 0x4000;
/// Words of screen memory
pub const SCREEN_WORDS: usize = 0x2000;
/// First address of screen memory
pub const SCREEN_BASE: u16 = 0x4000;
/// Address of the keyboard register
pub const KEYBOARD: u16 = 0x6000;

/// Creates a new bus, loading the provided images into their regions
/// # Examples
/// ```rust
/// # use emu16::prelude::*;
/// let bus = bus! {
///     Rom = &[0x5045, 0x0000],
///     Ram = &[0xdead, 0xbeef],
/// };
/// assert_eq!(bus.rom()[0], 0x5045);
/// assert_eq!(bus.ram()[1], 0xbeef_u16 as i16);
/// ```
#[macro_export]
macro_rules! bus {
    ($($name:path $(= $data:expr)?) ,* $(,)?) => {
        $crate::bus::Bus::new()
        $(
            $(
                .load_region_owned($name, $data)
            )?
        )*
    };
}

/// Represents a named region in memory
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Region {
    /// Program memory
    Rom,
    /// Data memory
    Ram,
    /// Screen buffer
    Screen,
    /// Keyboard register
    Keyboard,
}

impl Region {
    /// Gets the number of words in the region
    /// # Examples
    /// ```rust
    /// # use emu16::prelude::*;
    /// assert_eq!(Rom.capacity(), 32768);
    /// assert_eq!(Keyboard.capacity(), 1);
    /// ```
    pub fn capacity(&self) -> usize {
        match self {
            Region::Rom => ROM_WORDS,
            Region::Ram => RAM_WORDS,
            Region::Screen => SCREEN_WORDS,
            Region::Keyboard => 1,
        }
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Region::Rom => "ROM",
                Region::Ram => "RAM",
                Region::Screen => "Screen",
                Region::Keyboard => "Keyboard",
            }
        )
    }
}

/// Stores ROM, RAM, the screen, and the keyboard register,
/// along with the screen addresses written since the last flush
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Bus {
    rom: Vec<u16>,
    ram: Vec<i16>,
    screen: Vec<u16>,
    keyboard: u16,
    dirty: Vec<u16>,
}

impl Default for Bus {
    fn default() -> Self {
        Self {
            rom: vec![0; ROM_WORDS],
            ram: vec![0; RAM_WORDS],
            screen: vec![0; SCREEN_WORDS],
            keyboard: 0,
            dirty: vec![],
        }
    }
}

impl Bus {
    /// Constructs a new bus, with every region zeroed
    /// # Examples
    /// ```rust
    /// # use emu16::prelude::*;
    /// let bus = Bus::new();
    /// assert_eq!(bus.rom().len(), 0x8000);
    /// assert!(bus.dirty().is_empty());
    /// ```
    pub fn new() -> Self {
        Bus::default()
    }

    /// Reads a word from the unified address space.
    ///
    /// Returns [None] for the unmapped hole above the keyboard register.
    /// # Examples
    /// ```rust
    /// # use emu16::prelude::*;
    /// let mut bus = Bus::new();
    /// bus.set_keyboard(38);
    /// assert_eq!(bus.read(0x6000), Some(38));
    /// assert_eq!(bus.read(0x6001), None);
    /// ```
    pub fn read(&self, addr: u16) -> Option<i16> {
        match addr {
            0x0000..=0x3fff => self.ram.get(addr as usize).copied(),
            0x4000..=0x5fff => self
                .screen
                .get((addr - SCREEN_BASE) as usize)
                .map(|&word| word as i16),
            KEYBOARD => Some(self.keyboard as i16),
            _ => None,
        }
    }

    /// Writes a word to the unified address space.
    ///
    /// Screen writes are recorded in the dirty list. Writes to the keyboard
    /// register and to unmapped addresses are dropped.
    /// # Examples
    /// ```rust
    /// # use emu16::prelude::*;
    /// let mut bus = Bus::new();
    /// bus.write(0x4005, 0x1f);
    /// bus.write(0x6000, 0x41);
    /// assert_eq!(bus.screen()[5], 0x1f);
    /// assert_eq!(bus.dirty(), &[5]);
    /// assert_eq!(bus.keyboard(), 0);
    /// ```
    pub fn write(&mut self, addr: u16, data: i16) {
        match addr {
            0x0000..=0x3fff => {
                if let Some(word) = self.ram.get_mut(addr as usize) {
                    *word = data;
                }
            }
            0x4000..=0x5fff => {
                let offset = addr - SCREEN_BASE;
                if let Some(word) = self.screen.get_mut(offset as usize) {
                    *word = data as u16;
                    self.dirty.push(offset);
                }
            }
            _ => {}
        }
    }

    /// Fetches an instruction word from ROM
    #[inline(always)]
    pub fn fetch(&self, pc: u16) -> Option<u16> {
        self.rom.get(pc as usize).copied()
    }

    /// Loads data into a [Region] on an *owned* [Bus], for use during initialization
    pub fn load_region_owned(mut self, name: Region, data: &[u16]) -> Self {
        self.load_region(name, data).ok();
        self
    }

    /// Loads an image into the start of [Region::Rom] or [Region::Ram].
    ///
    /// Words past the end of the image are left as they were.
    /// If the image doesn't fit, returns [Error::ImageTooLarge] and leaves the region untouched.
    /// # Examples
    /// ```rust
    /// # use emu16::prelude::*;
    /// # fn main() -> Result<()> {
    /// let mut bus = Bus::new();
    /// bus.load_region(Rom, &[0x5045, 0x5083])?;
    /// assert_eq!(&bus.rom()[..3], &[0x5045, 0x5083, 0]);
    /// bus.load_region(Ram, &[0; 0x4001])
    ///     .expect_err("RAM only holds 0x4000 words");
    /// # Ok(())
    /// # }
    /// ```
    pub fn load_region(&mut self, name: Region, data: &[u16]) -> Result<&mut Self> {
        let capacity = name.capacity();
        if data.len() > capacity {
            return Err(Error::ImageTooLarge {
                region: name,
                len: data.len(),
                capacity,
            });
        }
        match name {
            Region::Rom => self.rom[..data.len()].copy_from_slice(data),
            Region::Ram => self
                .ram
                .iter_mut()
                .zip(data)
                .for_each(|(word, &data)| *word = data as i16),
            _ => return Err(Error::InvalidRegion { region: name }),
        }
        Ok(self)
    }

    /// Sets a single word of [Region::Rom] or [Region::Ram] to an arbitrary bit pattern
    /// # Examples
    /// ```rust
    /// # use emu16::prelude::*;
    /// # fn main() -> Result<()> {
    /// let mut bus = Bus::new();
    /// bus.set_cell(Ram, 0x10, 0xffff)?;
    /// assert_eq!(bus.ram()[0x10], -1);
    /// bus.set_cell(Rom, 0x8000, 1)
    ///     .expect_err("ROM ends at 0x7fff");
    /// # Ok(())
    /// # }
    /// ```
    pub fn set_cell(&mut self, name: Region, index: usize, value: u16) -> Result<()> {
        let invalid = Error::InvalidAddress {
            region: name,
            index,
        };
        match name {
            Region::Rom => *self.rom.get_mut(index).ok_or(invalid)? = value,
            Region::Ram => *self.ram.get_mut(index).ok_or(invalid)? = value as i16,
            _ => return Err(Error::InvalidRegion { region: name }),
        }
        Ok(())
    }

    /// Fills a [Region] with zeroes
    /// # Examples
    /// ```rust
    /// # use emu16::prelude::*;
    /// let mut bus = bus! { Ram = &[1, 2, 3] };
    /// bus.clear_region(Ram);
    /// assert!(bus.ram().iter().all(|&word| word == 0));
    /// ```
    pub fn clear_region(&mut self, name: Region) -> &mut Self {
        match name {
            Region::Rom => self.rom.fill(0),
            Region::Ram => self.ram.fill(0),
            Region::Screen => self.screen.fill(0),
            Region::Keyboard => self.keyboard = 0,
        }
        self
    }

    /// Sets the keyboard register to the currently held key (0 for none)
    pub fn set_keyboard(&mut self, code: u16) {
        self.keyboard = code;
    }

    /// Gets program memory
    pub fn rom(&self) -> &[u16] {
        &self.rom
    }

    /// Gets data memory
    pub fn ram(&self) -> &[i16] {
        &self.ram
    }

    /// Gets screen memory
    pub fn screen(&self) -> &[u16] {
        &self.screen
    }

    /// Gets the keyboard register
    pub fn keyboard(&self) -> u16 {
        self.keyboard
    }

    /// Gets the screen offsets written since the last flush, in write order
    pub fn dirty(&self) -> &[u16] {
        &self.dirty
    }

    /// Reports every dirty pixel to the [PixelSink], then forgets them.
    ///
    /// Returns the number of pixels reported.
    /// # Examples
    /// ```rust
    /// # use emu16::prelude::*;
    /// let mut bus = Bus::new();
    /// bus.write(0x4081, -1);
    /// let mut pixels = vec![];
    /// assert_eq!(bus.flush(&mut pixels), 1);
    /// assert_eq!(pixels[0], Pixel { x: 1, y: 1, r: 248, g: 252, b: 248 });
    /// assert!(bus.dirty().is_empty());
    /// ```
    pub fn flush(&mut self, sink: &mut impl PixelSink) -> usize {
        screen::flush(&mut self.dirty, &self.screen, sink)
    }

    /// Prints the screen to the terminal, lighting every nonzero word
    /// # Examples
    /// ```rust
    /// # use emu16::prelude::*;
    /// let mut bus = Bus::new();
    /// bus.write(0x4000, 0x7e0);
    /// bus.print_screen();
    /// ```
    pub fn print_screen(&self) {
        use screen::{HEIGHT, WIDTH};
        // draw with the drawille library, if available
        #[cfg(feature = "drawille")]
        {
            use drawille::Canvas;
            let mut canvas = Canvas::new(WIDTH as u32, HEIGHT as u32);
            self.screen
                .iter()
                .enumerate()
                .filter(|(_, &word)| word != 0)
                .for_each(|(index, _)| {
                    canvas.set((index % WIDTH) as u32, (index / WIDTH) as u32)
                });
            println!("{}", canvas.frame());
        }
        #[cfg(not(feature = "drawille"))]
        for (row, line) in self.screen.chunks(WIDTH).take(HEIGHT).enumerate() {
            println!(
                "{:04x}|{}|",
                SCREEN_BASE as usize + row * WIDTH,
                line.iter()
                    .map(|&word| if word != 0 { '█' } else { ' ' })
                    .collect::<String>()
            );
        }
    }
}
