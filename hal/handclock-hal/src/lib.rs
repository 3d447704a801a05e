//! Handclock Hardware Abstraction Layer
//!
//! This crate defines the collaborator traits the clock core consumes, so
//! the same control logic runs on a microcontroller, on a Linux board, or
//! against fakes in host tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (handclock-linux, etc.)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  handclock-core (sync, encoder, display)│
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  handclock-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ embedded-hal  │       │   std::net /  │
//! │  I2C drivers  │       │  MCU network  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`i2c::I2cBus`] - Addressed peripheral writes with a closed error set
//! - [`net::Resolver`] - Host name resolution
//! - [`net::DatagramSocket`] - Non-blocking UDP
//! - [`time::MonotonicClock`] - Millisecond uptime
//! - [`time::Housekeeping`] - Pending-work callback for long waits

#![no_std]
#![deny(unsafe_code)]

pub mod i2c;
pub mod net;
pub mod time;

// Re-export key traits at crate root for convenience
pub use i2c::{BusError, EmbeddedHalBus, I2cBus};
pub use net::{DatagramSocket, Resolver};
pub use time::{Housekeeping, MonotonicClock};
