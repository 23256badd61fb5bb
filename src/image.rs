// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Reads memory images in Logisim's `v2.0 raw` hexadecimal format
//!
//! ```text
//! v2.0 raw
//! # comments run to the end of the line
//! 5045 5083 029a
//! 0003: 20c0 4*0
//! ```
//!
//! Words are whitespace separated. `N*word` expands to `N` (decimal) copies of `word`,
//! and `addr:` labels are skipped.

use crate::{
    bus::ROM_WORDS,
    error::{Error, Result},
};
use std::path::Path;

/// The optional first line of an image
pub const HEADER: &str = "v2.0 raw";

/// Parses a single hexadecimal word, as typed into a cell editor
/// # Examples
/// ```rust
/// # use emu16::image::parse_word;
/// assert_eq!(parse_word("beef").unwrap(), 0xbeef);
/// assert_eq!(parse_word(" 7 ").unwrap(), 7);
/// parse_word("NaN").expect_err("N is not a hex digit");
/// parse_word("10000").expect_err("words are 16 bits");
/// parse_word("+5").expect_err("signs are not hex digits");
/// ```
pub fn parse_word(text: &str) -> Result<u16> {
    let malformed = || Error::MalformedEditValue { text: text.into() };
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    // from_str_radix would accept a leading sign
    if !digits.bytes().all(|digit| digit.is_ascii_hexdigit()) {
        return Err(malformed());
    }
    u16::from_str_radix(digits, 16).map_err(|_| malformed())
}

/// Parses the text of an image into words
///
/// Images longer than ROM fail with [Error::ImageTooLarge].
/// # Examples
/// ```rust
/// # use emu16::image::parse_image;
/// let image = parse_image("v2.0 raw\n5045 2*0 # two halts\n").unwrap();
/// assert_eq!(image, [0x5045, 0, 0]);
/// ```
pub fn parse_image(text: &str) -> Result<Vec<u16>> {
    let mut image = vec![];
    for (number, line) in text.lines().enumerate() {
        let line = line.split('#').next().unwrap_or_default().trim();
        if number == 0 && line == HEADER {
            continue;
        }
        for token in line.split_whitespace() {
            if token.ends_with(':') {
                continue;
            }
            match token.split_once('*') {
                Some((count, word)) => {
                    let count = count
                        .parse::<usize>()
                        .map_err(|_| Error::MalformedEditValue { text: token.into() })?;
                    let word = parse_word(word)?;
                    check_len(image.len().checked_add(count))?;
                    image.extend(std::iter::repeat(word).take(count));
                }
                None => {
                    check_len(image.len().checked_add(1))?;
                    image.push(parse_word(token)?);
                }
            }
        }
    }
    Ok(image)
}

/// No region holds more words than ROM
fn check_len(len: Option<usize>) -> Result<()> {
    match len {
        Some(len) if len <= ROM_WORDS => Ok(()),
        len => Err(Error::ImageTooLarge {
            region: crate::bus::Region::Rom,
            len: len.unwrap_or(usize::MAX),
            capacity: ROM_WORDS,
        }),
    }
}

/// Reads and parses an image file
pub fn load_image(path: impl AsRef<Path>) -> Result<Vec<u16>> {
    parse_image(&std::fs::read_to_string(path)?)
}
