// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Error type for the emu16 frontend

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Error originated in [`emu16`]
    #[error(transparent)]
    Emu16(#[from] emu16::error::Error),
    /// Error originated in [`std::io`]
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Error originated in [`minifb`]
    #[error(transparent)]
    Minifb(#[from] minifb::Error),
}
