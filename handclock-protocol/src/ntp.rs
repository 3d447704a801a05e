//! SNTP datagrams
//!
//! Only the subset the clock needs: a fixed client request and the
//! transmit timestamp (whole seconds) of the reply.
//!
//! Packet format (48 bytes, big-endian fields):
//! - 0: LI / version / mode (0xE3 = unsynchronised, v4, client)
//! - 1: stratum
//! - 2: poll interval
//! - 3: precision
//! - 12..16: reference identifier
//! - 40..44: transmit timestamp, seconds since 1900-01-01

use crate::error::WireError;

/// Size of every request and response
pub const NTP_PACKET_SIZE: usize = 48;

/// Server UDP port
pub const NTP_PORT: u16 = 123;

/// Seconds between the NTP epoch (1900) and the Unix epoch (1970)
pub const NTP_UNIX_EPOCH_DELTA: i64 = 2_208_988_800;

/// Offset of the transmit timestamp seconds field
pub const TRANSMIT_SECONDS_OFFSET: usize = 40;

const LI_VN_MODE: u8 = 0b1110_0011;
const POLL_INTERVAL: u8 = 6;
const PRECISION: u8 = 0xEC;
const REFERENCE_ID: [u8; 4] = [49, 0x4E, 49, 52];

const SECONDS_PER_HOUR: i64 = 3600;

/// Build the client request datagram
pub const fn request() -> [u8; NTP_PACKET_SIZE] {
    let mut packet = [0u8; NTP_PACKET_SIZE];
    packet[0] = LI_VN_MODE;
    packet[1] = 0; // stratum
    packet[2] = POLL_INTERVAL;
    packet[3] = PRECISION;
    packet[12] = REFERENCE_ID[0];
    packet[13] = REFERENCE_ID[1];
    packet[14] = REFERENCE_ID[2];
    packet[15] = REFERENCE_ID[3];
    packet
}

/// The part of a server reply the clock uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NtpResponse {
    /// Transmit timestamp, whole seconds since 1900
    pub transmit_seconds: u32,
}

impl NtpResponse {
    /// Parse a reply; anything shorter than a full packet is rejected
    pub fn parse(datagram: &[u8]) -> Result<Self, WireError> {
        if datagram.len() < NTP_PACKET_SIZE {
            return Err(WireError::Truncated);
        }

        let field = &datagram[TRANSMIT_SECONDS_OFFSET..TRANSMIT_SECONDS_OFFSET + 4];
        let transmit_seconds = u32::from_be_bytes([field[0], field[1], field[2], field[3]]);

        Ok(Self { transmit_seconds })
    }

    /// Local Unix time for a whole-hour time-zone offset
    pub fn unix_seconds(&self, timezone_hours: i8) -> i64 {
        i64::from(self.transmit_seconds) - NTP_UNIX_EPOCH_DELTA
            + i64::from(timezone_hours) * SECONDS_PER_HOUR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_layout() {
        let packet = request();
        assert_eq!(packet[0], 0xE3);
        assert_eq!(packet[1], 0);
        assert_eq!(packet[2], 6);
        assert_eq!(packet[3], 0xEC);
        assert_eq!(&packet[12..16], &[0x31, 0x4E, 0x31, 0x34]);

        let mut zero_fields = packet[4..12].iter().chain(packet[16..].iter());
        assert!(zero_fields.all(|&b| b == 0));
    }

    #[test]
    fn test_parse_transmit_seconds() {
        let mut reply = [0u8; NTP_PACKET_SIZE];
        reply[40..44].copy_from_slice(&3_913_056_000u32.to_be_bytes());

        let response = NtpResponse::parse(&reply).unwrap();
        assert_eq!(response.transmit_seconds, 3_913_056_000);
    }

    #[test]
    fn test_unix_conversion_with_timezone() {
        let response = NtpResponse {
            transmit_seconds: 3_913_056_000,
        };
        assert_eq!(response.unix_seconds(0), 1_704_067_200); // 2024-01-01T00:00:00Z
        assert_eq!(response.unix_seconds(1), 1_704_070_800);
        assert_eq!(response.unix_seconds(-5), 1_704_049_200);
    }

    #[test]
    fn test_short_reply_rejected() {
        let reply = [0u8; NTP_PACKET_SIZE - 1];
        assert_eq!(NtpResponse::parse(&reply), Err(WireError::Truncated));
    }
}
