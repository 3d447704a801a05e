//! Hand-angle patterns
//!
//! Every figure the display can draw, as target angles only. Speed, mode
//! and freshness are added later by the encoder.
//!
//! Angles are degrees clockwise from 12 o'clock. A movement whose two hands
//! both point to 7:30 (225°) reads as blank.

use crate::layout::{Side, Slot, DIGIT_COUNT, HANDS_PER_SLOT};

/// Target angles for one movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HandAngles {
    /// Hour hand
    pub h: u16,
    /// Minute hand
    pub m: u16,
}

/// Angles for one column, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HalfGlyph(pub [HandAngles; HANDS_PER_SLOT]);

/// Angles for one digit: left column, right column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DigitGlyph(pub [HalfGlyph; 2]);

impl DigitGlyph {
    /// One column of the digit
    pub const fn half(&self, side: Side) -> &HalfGlyph {
        &self.0[side.index()]
    }
}

/// Angles for the whole display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayGlyph(pub [DigitGlyph; DIGIT_COUNT]);

impl DisplayGlyph {
    /// Build a display from the same column pattern everywhere
    pub const fn uniform(half: HalfGlyph) -> Self {
        let digit = DigitGlyph([half, half]);
        Self([digit; DIGIT_COUNT])
    }

    /// Digit by position (0 = tens of hours)
    pub fn digit(&self, position: usize) -> Option<&DigitGlyph> {
        self.0.get(position)
    }

    /// Column pattern for a slot
    pub const fn half(&self, slot: Slot) -> &HalfGlyph {
        self.0[slot.digit()].half(slot.side())
    }
}

const fn a(h: u16, m: u16) -> HandAngles {
    HandAngles { h, m }
}

const fn col(top: HandAngles, middle: HandAngles, bottom: HandAngles) -> HalfGlyph {
    HalfGlyph([top, middle, bottom])
}

const BLANK: HandAngles = a(225, 225);
const BLANK_COLUMN: HalfGlyph = col(BLANK, BLANK, BLANK);

// Frequently used strokes
const DOWN_RIGHT: HandAngles = a(90, 180); // ┌
const DOWN_LEFT: HandAngles = a(270, 180); // ┐
const UP_RIGHT: HandAngles = a(0, 90); // └
const UP_LEFT: HandAngles = a(0, 270); // ┘
const VERTICAL: HandAngles = a(0, 180); // │
const RIGHT: HandAngles = a(90, 90); // ─ towards the right column
const LEFT: HandAngles = a(270, 270); // ─ towards the left column
const DOWN: HandAngles = a(180, 180); // ╷
const UP: HandAngles = a(0, 0); // ╵

/// Digit patterns, indexed by value
pub const DIGITS: [DigitGlyph; 10] = [
    // 0
    DigitGlyph([
        col(DOWN_RIGHT, VERTICAL, UP_RIGHT),
        col(DOWN_LEFT, VERTICAL, UP_LEFT),
    ]),
    // 1
    DigitGlyph([BLANK_COLUMN, col(DOWN, VERTICAL, UP)]),
    // 2
    DigitGlyph([
        col(RIGHT, DOWN_RIGHT, UP_RIGHT),
        col(DOWN_LEFT, UP_LEFT, LEFT),
    ]),
    // 3
    DigitGlyph([
        col(RIGHT, RIGHT, RIGHT),
        col(DOWN_LEFT, VERTICAL, UP_LEFT),
    ]),
    // 4
    DigitGlyph([
        col(DOWN, UP_RIGHT, BLANK),
        col(DOWN, VERTICAL, UP),
    ]),
    // 5
    DigitGlyph([
        col(DOWN_RIGHT, UP_RIGHT, RIGHT),
        col(LEFT, DOWN_LEFT, UP_LEFT),
    ]),
    // 6
    DigitGlyph([
        col(DOWN_RIGHT, VERTICAL, UP_RIGHT),
        col(LEFT, DOWN_LEFT, UP_LEFT),
    ]),
    // 7
    DigitGlyph([
        col(RIGHT, BLANK, BLANK),
        col(DOWN_LEFT, VERTICAL, UP),
    ]),
    // 8 (waist drawn with diagonals)
    DigitGlyph([
        col(DOWN_RIGHT, a(45, 135), UP_RIGHT),
        col(DOWN_LEFT, a(315, 225), UP_LEFT),
    ]),
    // 9
    DigitGlyph([
        col(DOWN_RIGHT, UP_RIGHT, RIGHT),
        col(DOWN_LEFT, VERTICAL, UP_LEFT),
    ]),
];

/// Every hand parked at the rest position
pub const REST: DisplayGlyph = DisplayGlyph::uniform(BLANK_COLUMN);

/// Every hand vertical: four pairs of bars ("IIII")
pub const BARS: DisplayGlyph = DisplayGlyph::uniform(col(VERTICAL, VERTICAL, VERTICAL));

/// Pattern for a decimal digit; `None` above 9
pub fn digit_for(value: u8) -> Option<&'static DigitGlyph> {
    DIGITS.get(value as usize)
}

/// Inverse of [`digit_for`]
pub fn value_of(glyph: &DigitGlyph) -> Option<u8> {
    DIGITS.iter().position(|d| d == glyph).map(|i| i as u8)
}

/// Pattern for `HH:MM`; `None` when either part exceeds 99
pub fn time_glyph(hours: u8, minutes: u8) -> Option<DisplayGlyph> {
    if hours > 99 || minutes > 99 {
        return None;
    }

    Some(DisplayGlyph([
        *digit_for(hours / 10)?,
        *digit_for(hours % 10)?,
        *digit_for(minutes / 10)?,
        *digit_for(minutes % 10)?,
    ]))
}
