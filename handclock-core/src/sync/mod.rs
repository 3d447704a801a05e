//! Network time synchronisation
//!
//! [`SyncMachine`] holds the cycle logic as a pure transition function;
//! [`SyncEngine`] drives it against a [`Resolver`] and a non-blocking
//! [`DatagramSocket`] and owns the resulting wall clock.
//!
//! [`Resolver`]: handclock_hal::Resolver
//! [`DatagramSocket`]: handclock_hal::DatagramSocket

pub mod engine;
pub mod machine;

pub use engine::{ServerName, SyncEngine, SyncOutcome, MAX_DRAIN};
pub use machine::{
    SyncEffect, SyncEvent, SyncMachine, SyncState, RESPONSE_TIMEOUT_MS, SYNC_INTERVAL_MS,
};
