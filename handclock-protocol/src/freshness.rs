//! Freshness markers
//!
//! A marker is a strictly increasing, never-zero counter stamped on every
//! hand command. Zero is what a freshly booted peripheral stores as "nothing
//! accepted yet", so a master that sent zero would be ignored forever.

use core::num::NonZeroU32;

/// Command freshness marker (never zero)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Marker(NonZeroU32);

impl Marker {
    /// First marker issued after boot
    pub const FIRST: Self = Self(NonZeroU32::MIN);

    /// Largest marker before wraparound
    pub const MAX: Self = Self(NonZeroU32::MAX);

    /// Wrap a raw value; `None` for zero
    pub const fn new(value: u32) -> Option<Self> {
        match NonZeroU32::new(value) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Raw value as sent on the wire
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// The marker after this one, wrapping `MAX` to `FIRST`
    pub const fn next(self) -> Self {
        match NonZeroU32::new(self.0.get().wrapping_add(1)) {
            Some(v) => Self(v),
            None => Self::FIRST,
        }
    }
}

impl Default for Marker {
    fn default() -> Self {
        Self::FIRST
    }
}

/// Peripheral-side acceptance rule
///
/// Tracks the last accepted marker for one column controller. A command is
/// applied only if its marker is strictly newer; before anything has been
/// accepted every marker passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MarkerGate {
    last: Option<Marker>,
}

impl MarkerGate {
    /// Create a gate in the uninitialised state
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Check a raw wire marker and record it if accepted
    ///
    /// Zero is never accepted once something has been, and accepted
    /// unconditionally but not recorded before that.
    pub fn accept_raw(&mut self, raw: u32) -> bool {
        match Marker::new(raw) {
            Some(marker) => self.accept(marker),
            None => self.last.is_none(),
        }
    }

    /// Check a marker and record it if accepted
    pub fn accept(&mut self, marker: Marker) -> bool {
        match self.last {
            Some(last) if marker <= last => false,
            _ => {
                self.last = Some(marker);
                true
            }
        }
    }

    /// Last accepted marker
    pub fn last(&self) -> Option<Marker> {
        self.last
    }
}
