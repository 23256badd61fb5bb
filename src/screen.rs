// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Turns screen writes into pixel updates
//!
//! The screen is a 128x64 grid of RGB565 words, stored row-major.
//! Nothing here knows how a pixel is painted; that's up to the [PixelSink].

/// Width of the screen, in pixels
pub const WIDTH: usize = 128;
/// Height of the screen, in pixels
pub const HEIGHT: usize = 64;

/// A single repainted pixel
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pixel {
    /// Column, `0..128`
    pub x: usize,
    /// Row, `0..64`
    pub y: usize,
    /// Red, in steps of 8
    pub r: u8,
    /// Green, in steps of 4
    pub g: u8,
    /// Blue, in steps of 8
    pub b: u8,
}

impl Pixel {
    /// Constructs the pixel at screen `offset`, colored by `word`
    /// # Examples
    /// ```rust
    /// # use emu16::prelude::*;
    /// let pixel = Pixel::new(130, 0xf800);
    /// assert_eq!((pixel.x, pixel.y), (2, 1));
    /// assert_eq!((pixel.r, pixel.g, pixel.b), (248, 0, 0));
    /// ```
    pub fn new(offset: u16, word: u16) -> Self {
        let [r, g, b] = rgb(word);
        let offset = offset as usize;
        Self {
            x: offset % WIDTH,
            y: offset / WIDTH,
            r,
            g,
            b,
        }
    }

    /// Packs the color as `0x00RRGGBB`
    pub fn rgb32(&self) -> u32 {
        (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }
}

/// Splits an RGB565 word into 8-bit components.
///
/// Each component is shifted up, not rescaled, so full intensity is 248/252/248.
/// # Examples
/// ```rust
/// # use emu16::screen::rgb;
/// assert_eq!(rgb(0xffff), [248, 252, 248]);
/// assert_eq!(rgb(0x0821), [8, 4, 8]);
/// ```
pub fn rgb(word: u16) -> [u8; 3] {
    let red = (word & 0b11111_000000_00000) >> 11;
    let green = (word & 0b00000_111111_00000) >> 5;
    let blue = word & 0b00000_000000_11111;
    [(red * 8) as u8, (green * 4) as u8, (blue * 8) as u8]
}

/// Receives pixel updates when the program issues `display`
pub trait PixelSink {
    /// Paints a single pixel
    fn paint(&mut self, pixel: Pixel);
}

/// Collects pixels in the order they were reported
impl PixelSink for Vec<Pixel> {
    fn paint(&mut self, pixel: Pixel) {
        self.push(pixel)
    }
}

/// Discards pixels, for running without a display
impl PixelSink for () {
    fn paint(&mut self, _: Pixel) {}
}

/// Reports each dirty offset, in write order, then clears the list
pub(crate) fn flush(dirty: &mut Vec<u16>, screen: &[u16], sink: &mut impl PixelSink) -> usize {
    let count = dirty.len();
    for offset in dirty.drain(..) {
        let word = screen.get(offset as usize).copied().unwrap_or_default();
        sink.paint(Pixel::new(offset, word));
    }
    count
}

/// A `0x00RRGGBB` framebuffer, the size of the screen
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameBuffer {
    buffer: Vec<u32>,
}

impl FrameBuffer {
    /// Constructs a black framebuffer
    pub fn new() -> Self {
        Self {
            buffer: vec![0; WIDTH * HEIGHT],
        }
    }

    /// Gets the framebuffer contents, row-major
    pub fn buffer(&self) -> &[u32] {
        &self.buffer
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl PixelSink for FrameBuffer {
    fn paint(&mut self, pixel: Pixel) {
        if let Some(rgb) = self.buffer.get_mut(pixel.y * WIDTH + pixel.x) {
            *rgb = pixel.rgb32();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_full_intensity() {
        assert_eq!(rgb(0xffff), [31 * 8, 63 * 4, 31 * 8]);
    }

    #[test]
    fn rgb_components() {
        assert_eq!(rgb(0b10000_000000_00000), [128, 0, 0]);
        assert_eq!(rgb(0b00000_100000_00000), [0, 128, 0]);
        assert_eq!(rgb(0b00000_000000_10000), [0, 0, 128]);
    }

    #[test]
    fn flush_keeps_duplicates_in_order() {
        let mut screen = vec![0; WIDTH * HEIGHT];
        screen[5] = 0x001f;
        screen[WIDTH] = 0xf800;
        let mut dirty = vec![5, WIDTH as u16, 5];
        let mut pixels = vec![];
        assert_eq!(3, flush(&mut dirty, &screen, &mut pixels));
        assert!(dirty.is_empty());
        assert_eq!(
            pixels,
            [
                Pixel { x: 5, y: 0, r: 0, g: 0, b: 248 },
                Pixel { x: 0, y: 1, r: 248, g: 0, b: 0 },
                Pixel { x: 5, y: 0, r: 0, g: 0, b: 248 },
            ]
        );
    }

    #[test]
    fn framebuffer_paint() {
        let mut fb = FrameBuffer::new();
        fb.paint(Pixel::new(WIDTH as u16 * 2 + 3, 0xffff));
        assert_eq!(fb.buffer()[WIDTH * 2 + 3], 0x00f8fcf8);
        assert_eq!(fb.buffer().iter().filter(|&&rgb| rgb != 0).count(), 1);
    }
}
