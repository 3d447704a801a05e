//! Runtime configuration
//!
//! Board-agnostic settings the control loop reads every iteration. Hosts
//! load them from wherever they keep configuration (a TOML file on Linux)
//! with the `serde` feature enabled.

pub mod types;

pub use types::*;
