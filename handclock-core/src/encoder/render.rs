//! Glyph expansion into bus commands

use handclock_protocol::{Hand, HandMode, HandPair, Marker};

use super::profile::{Profile, ADJUST_ACCELERATION, ADJUST_SPEED};
use crate::glyph::{self, DisplayGlyph, HalfGlyph};
use crate::layout::{HandIndex, Side, Slot, DIGIT_COUNT, SLOT_COUNT};

/// One digit as bus commands: left column, right column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Digit {
    halves: [HandPair; 2],
}

impl Digit {
    /// Column command by side
    pub const fn half(&self, side: Side) -> &HandPair {
        &self.halves[side.index()]
    }
}

/// The whole display as bus commands (4 digits, 8 columns, 24 movements)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FullDisplay {
    digits: [Digit; DIGIT_COUNT],
}

impl FullDisplay {
    /// Digit by position (0 = tens of hours)
    pub fn digit(&self, position: usize) -> Option<&Digit> {
        self.digits.get(position)
    }

    /// Column command for a slot
    pub const fn pair(&self, slot: Slot) -> &HandPair {
        self.digits[slot.digit()].half(slot.side())
    }

    /// Column commands in slot (transmission) order
    pub fn pairs(&self) -> impl Iterator<Item = (Slot, &HandPair)> + '_ {
        Slot::ALL.into_iter().map(move |slot| (slot, self.pair(slot)))
    }
}

/// Expand one column pattern with the given profile and marker
///
/// All 3 movements get the profile's speed, acceleration and direction,
/// zero adjustment, and the same marker.
pub fn expand(half: &HalfGlyph, profile: &Profile, marker: Marker) -> HandPair {
    let hands = half.0.map(|angles| Hand {
        angle_h: angles.h,
        angle_m: angles.m,
        speed: profile.speed,
        acceleration: profile.acceleration,
        mode: profile.direction.into(),
        adjust_h: 0,
        adjust_m: 0,
    });

    HandPair::new(hands, marker)
}

/// Expand a full display pattern
pub fn render_glyph(glyph: &DisplayGlyph, profile: &Profile, marker: Marker) -> FullDisplay {
    let digits = glyph.0.map(|digit| Digit {
        halves: [
            expand(digit.half(Side::Left), profile, marker),
            expand(digit.half(Side::Right), profile, marker),
        ],
    });

    FullDisplay { digits }
}

/// Expand `HH:MM`; `None` when either part exceeds 99
pub fn render_time(hours: u8, minutes: u8, profile: &Profile, marker: Marker) -> Option<FullDisplay> {
    let glyph = glyph::time_glyph(hours, minutes)?;
    Some(render_glyph(&glyph, profile, marker))
}

/// Build a manual adjustment for one movement
///
/// Starts from the last command sent to the movement's column so the other
/// two movements keep their targets. Only the addressed movement switches to
/// adjust mode, at the fixed fast profile, with its offsets clamped to `i8`.
pub fn render_adjust(
    last_sent: &[HandPair; SLOT_COUNT],
    hand: HandIndex,
    hour_offset: i32,
    minute_offset: i32,
    marker: Marker,
) -> HandPair {
    let mut pair = last_sent[hand.slot().index()];

    if let Some(target) = pair.hand_mut(hand.position()) {
        target.adjust_h = clamp_offset(hour_offset);
        target.adjust_m = clamp_offset(minute_offset);
        target.mode = HandMode::Adjust;
        target.speed = ADJUST_SPEED;
        target.acceleration = ADJUST_ACCELERATION;
    }

    pair.set_marker(marker);
    pair
}

fn clamp_offset(offset: i32) -> i8 {
    offset.clamp(i8::MIN as i32, i8::MAX as i32) as i8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::Direction;
    use crate::glyph::DIGITS;

    fn marker(raw: u32) -> Marker {
        Marker::new(raw).unwrap()
    }

    #[test]
    fn test_expand_applies_profile() {
        let profile = Profile::new(400, 150, Direction::Clockwise);
        let pair = expand(DIGITS[0].half(Side::Left), &profile, marker(7));

        assert_eq!(pair.marker(), marker(7));
        for (hand, angles) in pair.hands().iter().zip(DIGITS[0].half(Side::Left).0.iter()) {
            assert_eq!(hand.angle_h, angles.h);
            assert_eq!(hand.angle_m, angles.m);
            assert_eq!(hand.speed, 400);
            assert_eq!(hand.acceleration, 150);
            assert_eq!(hand.mode, HandMode::Clockwise);
            assert_eq!((hand.adjust_h, hand.adjust_m), (0, 0));
        }
    }

    #[test]
    fn test_render_time_digit_order() {
        let display = render_time(9, 5, &Profile::DEFAULT, marker(1)).unwrap();
        let expected = [0usize, 9, 0, 5];

        for (position, value) in expected.iter().enumerate() {
            let digit = display.digit(position).unwrap();
            let left = digit.half(Side::Left);
            let angles = DIGITS[*value].half(Side::Left).0;
            assert_eq!(left.hand(0).unwrap().angle_h, angles[0].h);
            assert_eq!(left.hand(2).unwrap().angle_m, angles[2].m);
        }
    }

    #[test]
    fn test_render_time_rejects_out_of_range() {
        assert!(render_time(100, 0, &Profile::DEFAULT, marker(1)).is_none());
    }

    #[test]
    fn test_pairs_in_slot_order_share_marker() {
        let display = render_time(12, 34, &Profile::DEFAULT, marker(3)).unwrap();
        let slots: heapless::Vec<usize, 8> = display.pairs().map(|(s, _)| s.index()).collect();
        assert_eq!(slots.as_slice(), &[0, 1, 2, 3, 4, 5, 6, 7]);
        assert!(display.pairs().all(|(_, p)| p.marker() == marker(3)));
    }

    #[test]
    fn test_render_adjust_preserves_siblings() {
        let display = render_time(10, 30, &Profile::DEFAULT, marker(4)).unwrap();
        let last_sent: [HandPair; SLOT_COUNT] = core::array::from_fn(|i| {
            *display.pair(Slot::new(i as u8).unwrap())
        });

        let hand = HandIndex::new(10).unwrap(); // slot 3, middle
        let pair = render_adjust(&last_sent, hand, 2, -1, marker(5));
        let before = last_sent[3];

        assert_eq!(pair.marker(), marker(5));
        assert_eq!(pair.hand(0), before.hand(0));
        assert_eq!(pair.hand(2), before.hand(2));

        let adjusted = pair.hand(1).unwrap();
        assert_eq!(adjusted.mode, HandMode::Adjust);
        assert_eq!((adjusted.adjust_h, adjusted.adjust_m), (2, -1));
        assert_eq!((adjusted.speed, adjusted.acceleration), (5000, 5000));
        assert_eq!(adjusted.angle_h, before.hand(1).unwrap().angle_h);
    }

    #[test]
    fn test_render_adjust_clamps_offsets() {
        let last_sent = [HandPair::default(); SLOT_COUNT];
        let pair = render_adjust(&last_sent, HandIndex::new(0).unwrap(), 1000, -1000, marker(2));
        let hand = pair.hand(0).unwrap();
        assert_eq!((hand.adjust_h, hand.adjust_m), (127, -128));
    }
}
