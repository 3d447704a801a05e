//! Clock command encoder
//!
//! Pure transformation from a symbolic display state (a glyph, a time of
//! day, a manual adjustment) into the per-column [`HandPair`] commands that
//! go on the bus. The only inputs besides the request are the current
//! [`Profile`] and freshness marker, both passed in explicitly.
//!
//! [`HandPair`]: handclock_protocol::HandPair

pub mod profile;
pub mod render;

pub use profile::{Direction, FreshnessCounter, Profile};
pub use render::{expand, render_adjust, render_glyph, render_time, Digit, FullDisplay};
