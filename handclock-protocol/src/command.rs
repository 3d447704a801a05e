//! Hand commands for the column controllers
//!
//! A [`HandPair`] is the unit of delivery: the 3 dual-hand movements of one
//! column, written atomically in a single I2C transaction and stamped with
//! one freshness marker. The layout is identical for all 8 addresses.

use crate::error::WireError;
use crate::freshness::Marker;

/// Movements per column controller
pub const HANDS_PER_PAIR: usize = 3;

/// Encoded size of one [`Hand`] (including its marker copy)
pub const HAND_WIRE_SIZE: usize = 15;

/// Encoded size of one [`HandPair`]
pub const HAND_PAIR_WIRE_SIZE: usize = HAND_WIRE_SIZE * HANDS_PER_PAIR;

/// How a movement travels to its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HandMode {
    /// Plain rotation towards the target
    Normal,
    /// Whichever direction is shorter
    #[default]
    ShortestPath,
    /// Always clockwise, even when the long way round
    Clockwise,
    /// Manual calibration nudge by the adjust offsets
    Adjust,
}

impl HandMode {
    /// Wire code
    pub const fn to_byte(self) -> u8 {
        match self {
            HandMode::Normal => 0,
            HandMode::ShortestPath => 1,
            HandMode::Clockwise => 2,
            HandMode::Adjust => 3,
        }
    }

    /// Parse a wire code
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(HandMode::Normal),
            1 => Some(HandMode::ShortestPath),
            2 => Some(HandMode::Clockwise),
            3 => Some(HandMode::Adjust),
            _ => None,
        }
    }
}

/// One movement: an hour hand and a minute hand on a shared axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Hand {
    /// Hour hand target in degrees (0 = 12 o'clock, clockwise)
    pub angle_h: u16,
    /// Minute hand target in degrees
    pub angle_m: u16,
    /// Top speed in steps per second
    pub speed: u16,
    /// Acceleration in steps per second squared
    pub acceleration: u16,
    /// Travel mode
    pub mode: HandMode,
    /// Hour hand calibration offset (adjust mode only)
    pub adjust_h: i8,
    /// Minute hand calibration offset (adjust mode only)
    pub adjust_m: i8,
}

impl Hand {
    fn encode_into(&self, marker: Marker, out: &mut [u8]) {
        out[0..2].copy_from_slice(&self.angle_h.to_le_bytes());
        out[2..4].copy_from_slice(&self.angle_m.to_le_bytes());
        out[4..6].copy_from_slice(&self.speed.to_le_bytes());
        out[6..8].copy_from_slice(&self.acceleration.to_le_bytes());
        out[8] = self.mode.to_byte();
        out[9] = self.adjust_h as u8;
        out[10] = self.adjust_m as u8;
        out[11..15].copy_from_slice(&marker.get().to_le_bytes());
    }

    fn decode_from(bytes: &[u8]) -> Result<(Self, u32), WireError> {
        let u16_at = |i: usize| u16::from_le_bytes([bytes[i], bytes[i + 1]]);
        let mode = HandMode::from_byte(bytes[8]).ok_or(WireError::InvalidMode(bytes[8]))?;
        let marker = u32::from_le_bytes([bytes[11], bytes[12], bytes[13], bytes[14]]);

        let hand = Hand {
            angle_h: u16_at(0),
            angle_m: u16_at(2),
            speed: u16_at(4),
            acceleration: u16_at(6),
            mode,
            adjust_h: bytes[9] as i8,
            adjust_m: bytes[10] as i8,
        };
        Ok((hand, marker))
    }
}

/// One column: 3 movements sharing a freshness marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HandPair {
    hands: [Hand; HANDS_PER_PAIR],
    marker: Marker,
}

impl HandPair {
    /// Build a pair from its 3 movements (top to bottom)
    pub const fn new(hands: [Hand; HANDS_PER_PAIR], marker: Marker) -> Self {
        Self { hands, marker }
    }

    /// Movement by position (0 = top)
    pub fn hand(&self, position: usize) -> Option<&Hand> {
        self.hands.get(position)
    }

    /// Mutable movement by position (0 = top)
    pub fn hand_mut(&mut self, position: usize) -> Option<&mut Hand> {
        self.hands.get_mut(position)
    }

    /// All 3 movements
    pub fn hands(&self) -> &[Hand; HANDS_PER_PAIR] {
        &self.hands
    }

    /// Freshness marker stamped on all 3 movements
    pub fn marker(&self) -> Marker {
        self.marker
    }

    /// Restamp the pair
    pub fn set_marker(&mut self, marker: Marker) {
        self.marker = marker;
    }

    /// Encode into a buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, WireError> {
        if buffer.len() < HAND_PAIR_WIRE_SIZE {
            return Err(WireError::BufferTooSmall);
        }

        self.write_hands(&mut buffer[..HAND_PAIR_WIRE_SIZE]);
        Ok(HAND_PAIR_WIRE_SIZE)
    }

    /// Encode into a fixed-size array
    pub fn to_bytes(&self) -> [u8; HAND_PAIR_WIRE_SIZE] {
        let mut buffer = [0u8; HAND_PAIR_WIRE_SIZE];
        self.write_hands(&mut buffer);
        buffer
    }

    fn write_hands(&self, buffer: &mut [u8]) {
        for (hand, chunk) in self
            .hands
            .iter()
            .zip(buffer.chunks_exact_mut(HAND_WIRE_SIZE))
        {
            hand.encode_into(self.marker, chunk);
        }
    }

    /// Decode a payload as received by a column controller
    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        if bytes.len() < HAND_PAIR_WIRE_SIZE {
            return Err(WireError::Truncated);
        }

        let mut hands = [Hand::default(); HANDS_PER_PAIR];
        let mut raw_marker = None;

        for (slot, chunk) in hands.iter_mut().zip(bytes.chunks_exact(HAND_WIRE_SIZE)) {
            let (hand, marker) = Hand::decode_from(chunk)?;
            match raw_marker {
                None => raw_marker = Some(marker),
                Some(first) if first != marker => return Err(WireError::MarkerMismatch),
                Some(_) => {}
            }
            *slot = hand;
        }

        let marker = raw_marker
            .and_then(Marker::new)
            .ok_or(WireError::ZeroMarker)?;

        Ok(Self { hands, marker })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_hand() -> Hand {
        Hand {
            angle_h: 270,
            angle_m: 180,
            speed: 5000,
            acceleration: 100,
            mode: HandMode::Adjust,
            adjust_h: -2,
            adjust_m: 127,
        }
    }

    #[test]
    fn test_hand_layout() {
        let pair = HandPair::new([sample_hand(); 3], Marker::new(0x0102_0304).unwrap());
        let bytes = pair.to_bytes();

        assert_eq!(&bytes[0..2], &270u16.to_le_bytes());
        assert_eq!(&bytes[2..4], &180u16.to_le_bytes());
        assert_eq!(&bytes[4..6], &5000u16.to_le_bytes());
        assert_eq!(&bytes[6..8], &100u16.to_le_bytes());
        assert_eq!(bytes[8], 3); // adjust
        assert_eq!(bytes[9], 0xFE); // -2
        assert_eq!(bytes[10], 0x7F);
        assert_eq!(&bytes[11..15], &[0x04, 0x03, 0x02, 0x01]);
    }

    #[test]
    fn test_marker_repeated_per_hand() {
        let pair = HandPair::new([Hand::default(); 3], Marker::new(42).unwrap());
        let bytes = pair.to_bytes();
        for i in 0..HANDS_PER_PAIR {
            let start = i * HAND_WIRE_SIZE + 11;
            assert_eq!(&bytes[start..start + 4], &42u32.to_le_bytes());
        }
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let pair = HandPair::default();
        let mut buffer = [0u8; HAND_PAIR_WIRE_SIZE - 1];
        assert_eq!(pair.encode(&mut buffer), Err(WireError::BufferTooSmall));
    }

    #[test]
    fn test_encode_matches_to_bytes() {
        let pair = HandPair::new([sample_hand(); 3], Marker::new(7).unwrap());
        let mut buffer = [0xAAu8; HAND_PAIR_WIRE_SIZE + 3];

        assert_eq!(pair.encode(&mut buffer), Ok(HAND_PAIR_WIRE_SIZE));
        assert_eq!(&buffer[..HAND_PAIR_WIRE_SIZE], &pair.to_bytes());
        assert_eq!(&buffer[HAND_PAIR_WIRE_SIZE..], &[0xAA; 3]);
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        let pair = HandPair::new([sample_hand(); 3], Marker::new(9).unwrap());
        let bytes = pair.to_bytes();

        assert_eq!(
            HandPair::decode(&bytes[..HAND_PAIR_WIRE_SIZE - 1]),
            Err(WireError::Truncated)
        );

        let mut bad_mode = bytes;
        bad_mode[HAND_WIRE_SIZE + 8] = 9;
        assert_eq!(HandPair::decode(&bad_mode), Err(WireError::InvalidMode(9)));

        let mut mismatch = bytes;
        mismatch[2 * HAND_WIRE_SIZE + 11] = 10;
        assert_eq!(HandPair::decode(&mismatch), Err(WireError::MarkerMismatch));

        let zeroed = HandPair::new([Hand::default(); 3], Marker::FIRST).to_bytes();
        let mut zero_marker = zeroed;
        for i in 0..HANDS_PER_PAIR {
            zero_marker[i * HAND_WIRE_SIZE + 11] = 0;
        }
        assert_eq!(HandPair::decode(&zero_marker), Err(WireError::ZeroMarker));
    }

    #[test]
    fn test_mode_codes() {
        for byte in 0..4u8 {
            assert_eq!(HandMode::from_byte(byte).map(HandMode::to_byte), Some(byte));
        }
        assert_eq!(HandMode::from_byte(4), None);
    }

    fn arb_hand() -> impl Strategy<Value = Hand> {
        (0u16..360, 0u16..360, any::<u16>(), any::<u16>(), 0u8..4, any::<i8>(), any::<i8>())
            .prop_map(|(angle_h, angle_m, speed, acceleration, mode, adjust_h, adjust_m)| Hand {
                angle_h,
                angle_m,
                speed,
                acceleration,
                mode: HandMode::from_byte(mode).unwrap(),
                adjust_h,
                adjust_m,
            })
    }

    proptest! {
        #[test]
        fn prop_peripheral_sees_what_master_sent(
            hands in proptest::array::uniform3(arb_hand()),
            raw in 1u32..=u32::MAX,
        ) {
            let pair = HandPair::new(hands, Marker::new(raw).unwrap());
            let mut buffer = [0u8; 64];
            let len = pair.encode(&mut buffer).unwrap();
            prop_assert_eq!(len, HAND_PAIR_WIRE_SIZE);
            prop_assert_eq!(HandPair::decode(&buffer[..len]), Ok(pair));
        }
    }
}
