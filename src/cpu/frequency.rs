// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Selects the instruction rate of the [super::CPU]

use crate::error::Error;
use std::{fmt::Display, str::FromStr, time::Duration};

/// Instructions per second.
///
/// The standard rates are the powers of two from 1 Hz to 128 kHz,
/// but any rate is accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frequency(pub u32);

impl Frequency {
    /// The fastest standard rate
    pub const MAX: Frequency = Frequency(131072);

    /// Gets the rate in Hz
    pub fn hz(&self) -> u32 {
        self.0
    }

    /// Iterates over the standard rates, slowest first
    /// # Examples
    /// ```rust
    /// # use emu16::prelude::*;
    /// let rates: Vec<_> = Frequency::standard().collect();
    /// assert_eq!(rates.len(), 18);
    /// assert_eq!(rates[0], Frequency(1));
    /// assert_eq!(rates[17], Frequency::MAX);
    /// ```
    pub fn standard() -> impl Iterator<Item = Frequency> {
        (0..=Self::MAX.0.ilog2()).map(|shift| Frequency(1 << shift))
    }

    /// Returns true if this is one of the [standard](Frequency::standard) rates
    pub fn is_standard(&self) -> bool {
        self.0.is_power_of_two() && *self <= Self::MAX
    }

    /// Gets the number of whole instructions due after `elapsed`
    /// # Examples
    /// ```rust
    /// # use emu16::prelude::*;
    /// # use std::time::Duration;
    /// assert_eq!(Frequency(8192).budget(Duration::from_millis(500)), 4096);
    /// assert_eq!(Frequency(8192).budget(Duration::from_micros(10)), 0);
    /// ```
    pub fn budget(&self, elapsed: Duration) -> usize {
        (self.0 as f64 * elapsed.as_secs_f64()).floor() as usize
    }
}

impl Default for Frequency {
    fn default() -> Self {
        Frequency(8192)
    }
}

impl Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            hz if hz >= 1024 && hz % 1024 == 0 => write!(f, "{}k", hz / 1024),
            hz => write!(f, "{hz}"),
        }
    }
}

impl FromStr for Frequency {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = || Error::InvalidFrequency { text: s.to_string() };
        let text = s.trim().to_lowercase();
        let text = text.strip_suffix("hz").unwrap_or(&text).trim_end();
        let (digits, scale) = match text.strip_suffix('k') {
            Some(digits) => (digits, 1024),
            None => (text, 1),
        };
        digits
            .parse::<u32>()
            .ok()
            .and_then(|hz| hz.checked_mul(scale))
            .map(Frequency)
            .ok_or_else(invalid)
    }
}
