// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Converts wall-clock time into an instruction budget

use super::Frequency;
use std::time::Instant;

/// Remembers when instructions were last budgeted
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Throttle {
    baseline: Option<Instant>,
}

impl Throttle {
    /// Forgets the baseline, so the next tick only records the time
    pub fn restart(&mut self) {
        self.baseline = None;
    }

    /// Gets the time of the last tick which retired instructions
    pub fn baseline(&self) -> Option<Instant> {
        self.baseline
    }

    /// Gets the number of instructions due at `now`.
    ///
    /// The first call after a [restart](Throttle::restart) returns 0 and records `now`.
    /// The baseline only advances when at least one instruction is due,
    /// so short ticks accumulate instead of being lost.
    /// # Examples
    /// ```rust
    /// # use emu16::cpu::{throttle::Throttle, Frequency};
    /// # use std::time::{Duration, Instant};
    /// let mut throttle = Throttle::default();
    /// let start = Instant::now();
    /// assert_eq!(throttle.budget(start, Frequency(8192)), 0);
    /// assert_eq!(throttle.budget(start + Duration::from_millis(500), Frequency(8192)), 4096);
    /// ```
    pub fn budget(&mut self, now: Instant, frequency: Frequency) -> usize {
        let Some(baseline) = self.baseline else {
            self.baseline = Some(now);
            return 0;
        };
        let budget = frequency.budget(now.saturating_duration_since(baseline));
        if budget > 0 {
            self.baseline = Some(now);
        }
        budget
    }
}
