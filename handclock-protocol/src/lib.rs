//! Handclock wire protocols
//!
//! Two independent formats live here:
//!
//! - [`ntp`]: the 48-byte SNTP request/response exchanged with the time
//!   server over UDP.
//! - [`command`]: the fixed-width hand command written over I2C to each of
//!   the 8 column controllers.
//!
//! # Hand command payload
//!
//! One I2C write carries one [`HandPair`] (a column of 3 movements, each
//! with an hour and a minute hand), all little-endian:
//! ```text
//! ┌──────────┬──────────┬───────┬───────┬──────┬──────────┬──────────┬────────┐
//! │ ANGLE_H  │ ANGLE_M  │ SPEED │ ACCEL │ MODE │ ADJUST_H │ ADJUST_M │ MARKER │  x3
//! │ u16      │ u16      │ u16   │ u16   │ u8   │ i8       │ i8       │ u32    │
//! └──────────┴──────────┴───────┴───────┴──────┴──────────┴──────────┴────────┘
//! ```
//!
//! Every command carries a freshness [`Marker`]. Peripherals apply a command
//! only if its marker is strictly newer than the last one they accepted
//! (see [`MarkerGate`]), which is why the master never emits marker 0.

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod error;
pub mod freshness;
pub mod ntp;

pub use command::{Hand, HandMode, HandPair, HANDS_PER_PAIR, HAND_PAIR_WIRE_SIZE, HAND_WIRE_SIZE};
pub use error::WireError;
pub use freshness::{Marker, MarkerGate};
pub use ntp::{NtpResponse, NTP_PACKET_SIZE, NTP_PORT};
