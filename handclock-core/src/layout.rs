//! Physical layout of the display
//!
//! 4 digits, each split into a left and right column (a slot). Each slot is
//! one I2C peripheral driving 3 movements, top to bottom. All index
//! arithmetic between digits, slots, bus addresses and movements lives here.

/// Digits on the display
pub const DIGIT_COUNT: usize = 4;

/// Column controllers on the bus
pub const SLOT_COUNT: usize = 8;

/// Movements on the display
pub const HAND_COUNT: usize = 24;

/// Movements per column
pub const HANDS_PER_SLOT: usize = 3;

const ROLES: [&str; SLOT_COUNT] = [
    "Hours Tens - Left",
    "Hours Tens - Right",
    "Hours Units - Left",
    "Hours Units - Right",
    "Minutes Tens - Left",
    "Minutes Tens - Right",
    "Minutes Units - Left",
    "Minutes Units - Right",
];

/// Column within a digit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// 0 for left, 1 for right
    pub const fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

/// One column controller (0-7, left to right)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Slot(u8);

impl Slot {
    /// All slots in transmission order
    pub const ALL: [Slot; SLOT_COUNT] = [
        Slot(0),
        Slot(1),
        Slot(2),
        Slot(3),
        Slot(4),
        Slot(5),
        Slot(6),
        Slot(7),
    ];

    /// Slot by index; `None` past the last column
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < SLOT_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Zero-based index
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// I2C address of the column controller
    pub const fn address(self) -> u8 {
        self.0 + 1
    }

    /// Digit this column belongs to
    pub const fn digit(self) -> usize {
        self.0 as usize / 2
    }

    /// Side of the digit
    pub const fn side(self) -> Side {
        if self.0 % 2 == 0 {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Human-readable position, for diagnostics
    pub const fn role(self) -> &'static str {
        ROLES[self.0 as usize]
    }
}

/// One movement on the display (0-23, column by column, top to bottom)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HandIndex(u8);

impl HandIndex {
    /// Movement by index; `None` past the last movement
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < HAND_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Zero-based index
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Column the movement belongs to
    pub const fn slot(self) -> Slot {
        Slot(self.0 / HANDS_PER_SLOT as u8)
    }

    /// Position within the column (0 = top)
    pub const fn position(self) -> usize {
        self.0 as usize % HANDS_PER_SLOT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_addressing() {
        for (i, slot) in Slot::ALL.iter().enumerate() {
            assert_eq!(slot.index(), i);
            assert_eq!(slot.address() as usize, i + 1);
        }
        assert_eq!(Slot::new(8), None);
    }

    #[test]
    fn test_slot_digit_and_side() {
        let slot = Slot::new(5).unwrap();
        assert_eq!(slot.digit(), 2);
        assert_eq!(slot.side(), Side::Right);
        assert_eq!(slot.role(), "Minutes Tens - Right");
    }

    #[test]
    fn test_hand_index_mapping() {
        let hand = HandIndex::new(10).unwrap();
        assert_eq!(hand.slot(), Slot::new(3).unwrap());
        assert_eq!(hand.position(), 1);

        let last = HandIndex::new(23).unwrap();
        assert_eq!(last.slot(), Slot::new(7).unwrap());
        assert_eq!(last.position(), 2);

        assert_eq!(HandIndex::new(24), None);
    }
}
