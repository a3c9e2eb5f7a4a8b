//! Positions on the 32-bit hash ring.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A point in the ring's hash space, `0..=u32::MAX`.
///
/// Positions order numerically; the ring wraps from `u32::MAX` back to `0`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Position(pub u32);

impl Position {
    pub const MIN: Position = Position(0);
    pub const MAX: Position = Position(u32::MAX);

    /// Clockwise distance from `self` to `other`.
    ///
    /// Distance from a position to itself is zero.
    #[inline]
    pub fn distance_to(&self, other: &Self) -> u64 {
        if other.0 >= self.0 {
            u64::from(other.0 - self.0)
        } else {
            (u64::from(u32::MAX) - u64::from(self.0)) + u64::from(other.0) + 1
        }
    }

    #[inline]
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

impl From<u32> for Position {
    fn from(v: u32) -> Self {
        Position(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_forward_and_wrapping() {
        assert_eq!(Position(100).distance_to(&Position(200)), 100);
        assert_eq!(Position(100).distance_to(&Position(100)), 0);
        assert_eq!(Position::MAX.distance_to(&Position::MIN), 1);
        assert_eq!(Position(200).distance_to(&Position(100)), (1u64 << 32) - 100);
    }

    #[test]
    fn test_display_is_fixed_width_hex() {
        assert_eq!(Position(0xab).to_string(), "000000ab");
    }
}
