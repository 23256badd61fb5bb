// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The register-register operations selected by `funct`
//!
//! |funct| op  | effect                    |
//! |-----|-----|---------------------------|
//! | `0` | and | Rs & Rt                   |
//! | `1` | or  | Rs \| Rt                  |
//! | `2` | add | Rs + Rt, wrapping         |
//! | `6` | sub | Rs - Rt, wrapping         |
//! | `7` | slt | 1 if Rs < Rt (signed)     |

use crate::error::Error;
use std::fmt::Display;

/// Selects an ALU operation
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Funct {
    /// Bitwise and
    And = 0x0,
    /// Bitwise or
    Or = 0x1,
    /// Wrapping addition
    Add = 0x2,
    /// Wrapping subtraction
    Sub = 0x6,
    /// Set on signed less-than
    Slt = 0x7,
}

impl Funct {
    /// Performs the operation
    /// # Examples
    /// ```rust
    /// # use emu16::cpu::alu::Funct;
    /// assert_eq!(Funct::Add.apply(i16::MAX, 1), i16::MIN);
    /// assert_eq!(Funct::Slt.apply(-1, 0), 1);
    /// ```
    #[inline(always)]
    pub fn apply(self, s: i16, t: i16) -> i16 {
        match self {
            Funct::And => s & t,
            Funct::Or => s | t,
            Funct::Add => s.wrapping_add(t),
            Funct::Sub => s.wrapping_sub(t),
            Funct::Slt => (s < t) as i16,
        }
    }
}

impl TryFrom<u8> for Funct {
    type Error = Error;

    fn try_from(funct: u8) -> Result<Self, Self::Error> {
        match funct {
            0x0 => Ok(Funct::And),
            0x1 => Ok(Funct::Or),
            0x2 => Ok(Funct::Add),
            0x6 => Ok(Funct::Sub),
            0x7 => Ok(Funct::Slt),
            _ => Err(Error::InvalidAluFunction { funct }),
        }
    }
}

impl Display for Funct {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Funct::And => "and",
            Funct::Or => "or",
            Funct::Add => "add",
            Funct::Sub => "sub",
            Funct::Slt => "slt",
        })
    }
}

/// Performs the ALU operation selected by the raw `funct` bits
///
/// Returns [Error::InvalidAluFunction] for funct `3`, `4`, and `5`.
pub fn alu(funct: u8, s: i16, t: i16) -> Result<i16, Error> {
    Ok(Funct::try_from(funct)?.apply(s, t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::random;

    #[test]
    fn add_wraps() {
        assert_eq!(alu(0x2, 32767, 1).unwrap(), -32768);
        assert_eq!(alu(0x2, -32768, -1).unwrap(), 32767);
    }

    #[test]
    fn sub_wraps() {
        assert_eq!(alu(0x6, -32768, 1).unwrap(), 32767);
        assert_eq!(alu(0x6, 5, 8).unwrap(), -3);
    }

    #[test]
    fn slt_is_signed() {
        assert_eq!(alu(0x7, -1, 1).unwrap(), 1);
        assert_eq!(alu(0x7, 1, -1).unwrap(), 0);
        assert_eq!(alu(0x7, 4, 4).unwrap(), 0);
    }

    #[test]
    fn bitwise() {
        for _ in 0..0x100 {
            let (s, t) = (random::<i16>(), random::<i16>());
            assert_eq!(alu(0x0, s, t).unwrap(), s & t);
            assert_eq!(alu(0x1, s, t).unwrap(), s | t);
        }
    }

    #[test]
    fn invalid_funct() {
        for funct in [0x3, 0x4, 0x5] {
            match alu(funct, 1, 1) {
                Err(Error::InvalidAluFunction { funct: got }) => assert_eq!(got, funct),
                other => panic!("funct {funct} should be invalid, got {other:?}"),
            }
        }
    }
}
