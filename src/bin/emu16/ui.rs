// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)
#![allow(missing_docs)]
//! Platform-specific IO/UI code, and some debug functionality.

use crate::error::Result;
use emu16::{
    screen::{FrameBuffer, HEIGHT, WIDTH},
    Emulator,
};
use minifb::*;
use owo_colors::OwoColorize;
use std::{
    path::{Path, PathBuf},
    time::Instant,
};

#[derive(Clone, Debug)]
pub struct UIBuilder {
    pub name: Option<&'static str>,
    pub rom: Option<PathBuf>,
    pub window_options: WindowOptions,
}

impl UIBuilder {
    pub fn new(rom: impl AsRef<Path>) -> Self {
        UIBuilder {
            rom: Some(rom.as_ref().to_owned()),
            ..Default::default()
        }
    }
    pub fn build(&self) -> Result<UI> {
        let ui = UI {
            window: Window::new(
                self.name.unwrap_or_default(),
                WIDTH,
                HEIGHT,
                self.window_options,
            )?,
            keyboard: Default::default(),
            fb: Default::default(),
            rom: self.rom.to_owned().unwrap_or_default(),
            time: Instant::now(),
        };
        Ok(ui)
    }
}

impl Default for UIBuilder {
    fn default() -> Self {
        UIBuilder {
            name: Some("emu16"),
            rom: None,
            window_options: WindowOptions {
                title: true,
                resize: false,
                scale: Scale::X8,
                scale_mode: ScaleMode::AspectRatioStretch,
                none: true,
                ..Default::default()
            },
        }
    }
}

#[derive(Debug)]
pub struct UI {
    window: Window,
    keyboard: Vec<Key>,
    fb: FrameBuffer,
    rom: PathBuf,
    time: Instant,
}

impl UI {
    /// Gets the framebuffer that DISPLAY paints into
    pub fn framebuffer(&mut self) -> &mut FrameBuffer {
        &mut self.fb
    }

    pub fn frame(&mut self, emu: &mut Emulator) -> Result<bool> {
        let name = self
            .rom
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();
        if emu.state().is_running() {
            self.window.set_title(&format!(
                "emu16 {name} ▶ {} {:02.02}",
                emu.frequency(),
                (1.0 / self.time.elapsed().as_secs_f64())
            ));
        } else {
            self.window
                .set_title(&format!("emu16 {name} ⏸ {}", emu.state()));
        }
        if !self.window.is_open() {
            return Ok(false);
        }
        self.time = Instant::now();
        // update framebuffer
        self.window
            .update_with_buffer(self.fb.buffer(), WIDTH, HEIGHT)?;
        Ok(true)
    }

    pub fn keys(&mut self, emu: &mut Emulator) -> Result<bool> {
        let held = self.window.get_keys();
        let pressed: Vec<Key> = held
            .iter()
            .copied()
            .filter(|key| !self.keyboard.contains(key))
            .collect();
        // handle keybinds for the UI
        for key in pressed {
            use Key::*;
            match key {
                F1 => emu.cpu.dump(),
                F2 => emu.bus.print_screen(),
                F4 => eprintln!("Debug {}.", {
                    emu.cpu.flags.debug();
                    if emu.cpu.flags.debug {
                        "enabled"
                    } else {
                        "disabled"
                    }
                }),
                F5 => {
                    if emu.state().is_running() {
                        emu.stop();
                        eprintln!("Stopped.");
                    } else {
                        emu.start();
                        eprintln!("Running.");
                    }
                }
                F6 => {
                    eprintln!("Step {:04x}", emu.cpu.pc());
                    if let Err(e) = emu.step(&mut self.fb) {
                        eprintln!("{}", e.bold().red());
                    }
                }
                F9 => {
                    eprintln!("Reset at {:04x}", emu.cpu.pc());
                    emu.reset();
                }
                Escape => return Ok(false),
                _ => (),
            }
        }
        // the most recently pressed key wins; releasing everything reads as 0
        let code = held
            .iter()
            .rev()
            .find_map(|&key| identify_key(key))
            .unwrap_or_default();
        emu.set_keyboard(code);
        self.keyboard = held;
        Ok(true)
    }
}

/// Maps a host key onto the code the keyboard register reports
pub fn identify_key(key: Key) -> Option<u16> {
    use Key::*;
    #[rustfmt::skip]
    let code = match key {
        Left => 37, Up => 38, Right => 39, Down => 40,
        Enter => 10, Space => b' ',
        Key0 => b'0', Key1 => b'1', Key2 => b'2', Key3 => b'3', Key4 => b'4',
        Key5 => b'5', Key6 => b'6', Key7 => b'7', Key8 => b'8', Key9 => b'9',
        A => b'A', B => b'B', C => b'C', D => b'D', E => b'E', F => b'F', G => b'G',
        H => b'H', I => b'I', J => b'J', K => b'K', L => b'L', M => b'M', N => b'N',
        O => b'O', P => b'P', Q => b'Q', R => b'R', S => b'S', T => b'T', U => b'U',
        V => b'V', W => b'W', X => b'X', Y => b'Y', Z => b'Z',
        Comma => b',', Period => b'.', Minus => b'-', Equal => b'=', Slash => b'/',
        Semicolon => b';', Apostrophe => b'\'', LeftBracket => b'[', RightBracket => b']',
        Backslash => b'\\', Backquote => b'`',
        _ => return None,
    };
    Some(code as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows() {
        assert_eq!(identify_key(Key::Left), Some(37));
        assert_eq!(identify_key(Key::Down), Some(40));
    }

    #[test]
    fn ascii() {
        assert_eq!(identify_key(Key::A), Some(b'A' as u16));
        assert_eq!(identify_key(Key::Key7), Some(b'7' as u16));
        assert_eq!(identify_key(Key::Enter), Some(10));
    }

    #[test]
    fn punctuation() {
        assert_eq!(identify_key(Key::Comma), Some(b',' as u16));
        assert_eq!(identify_key(Key::Apostrophe), Some(0x27));
        assert_eq!(identify_key(Key::Backslash), Some(0x5c));
        assert_eq!(identify_key(Key::Backquote), Some(0x60));
        assert_eq!(identify_key(Key::RightBracket), Some(b']' as u16));
    }

    #[test]
    fn unmapped() {
        assert_eq!(identify_key(Key::F5), None);
    }

    #[test]
    fn builder_default() {
        let builder = UIBuilder::default();
        assert_eq!(builder.name, Some("emu16"));
        assert!(builder.rom.is_none());
    }
}
