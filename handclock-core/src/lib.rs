//! Board-agnostic core logic for the Handclock controller
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Display layout and hand-angle patterns
//! - Command encoding (profiles, freshness markers, manual adjust)
//! - Display controller fanning commands out to the 8 column controllers
//! - NTP time sync state machine and driver
//! - Animation scripts and the main control loop
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

// This must go first so the logging macros are visible everywhere
#[macro_use]
mod fmt;

pub mod animation;
pub mod app;
pub mod config;
pub mod controller;
pub mod encoder;
pub mod glyph;
pub mod layout;
pub mod sync;
pub mod time;

pub use app::{ClockApp, DisplayAction, PollOutcome};
pub use controller::{DeliveryReport, DisplayController, DisplayError};
