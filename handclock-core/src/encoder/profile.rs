//! Motion profile and freshness counter

use handclock_protocol::{HandMode, Marker};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Speed used for manual adjustment
pub const ADJUST_SPEED: u16 = 5000;

/// Acceleration used for manual adjustment
pub const ADJUST_ACCELERATION: u16 = 5000;

/// Travel direction applied to rendered hands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Plain rotation
    Normal,
    /// Shorter way round
    #[default]
    ShortestPath,
    /// Clockwise only
    Clockwise,
}

impl From<Direction> for HandMode {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Normal => HandMode::Normal,
            Direction::ShortestPath => HandMode::ShortestPath,
            Direction::Clockwise => HandMode::Clockwise,
        }
    }
}

/// Motion parameters stamped on every hand of the next render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Profile {
    /// Top speed
    pub speed: u16,
    /// Acceleration
    pub acceleration: u16,
    /// Travel direction
    pub direction: Direction,
}

impl Profile {
    /// Boot and rest profile
    pub const DEFAULT: Self = Self::new(200, 100, Direction::ShortestPath);

    /// Create a profile
    pub const fn new(speed: u16, acceleration: u16, direction: Direction) -> Self {
        Self {
            speed,
            acceleration,
            direction,
        }
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Source of freshness markers
///
/// Holds the marker the next logical command will carry. Every command
/// stamps [`current`](Self::current) and then calls
/// [`advance`](Self::advance) exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FreshnessCounter {
    next: Marker,
}

impl FreshnessCounter {
    /// Counter starting at the first marker
    pub const fn new() -> Self {
        Self {
            next: Marker::FIRST,
        }
    }

    /// Counter resuming at a given marker
    pub const fn starting_at(next: Marker) -> Self {
        Self { next }
    }

    /// Marker for the command being built
    pub const fn current(&self) -> Marker {
        self.next
    }

    /// Move past the current marker (never lands on zero)
    pub fn advance(&mut self) {
        self.next = self.next.next();
    }
}
