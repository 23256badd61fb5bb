// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The run state of the [super::CPU]

use std::fmt::Display;

/// The run state of the CPU
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum State {
    /// Stopped by the host, or never started
    #[default]
    Idle,
    /// Retiring instructions on every tick
    Running,
    /// Stopped on the halt sentinel
    Halted,
    /// Stopped on an instruction that could not be executed
    Faulted,
}

impl State {
    /// Returns true if ticks will retire instructions
    pub fn is_running(&self) -> bool {
        *self == State::Running
    }
}

impl Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            State::Idle => "Idle",
            State::Running => "Running",
            State::Halted => "Halted",
            State::Faulted => "Faulted",
        })
    }
}
