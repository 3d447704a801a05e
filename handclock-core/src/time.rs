//! Wall-clock time
//!
//! The committed time is a (Unix seconds, uptime ms) anchor; reading the
//! clock extrapolates from the anchor with the monotonic millisecond counter.
//! Until something commits a time the clock reads as unknown.

use chrono::{DateTime, Datelike, Timelike};

/// Local time fields the display cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LocalTime {
    /// 0-23
    pub hour: u8,
    /// 0-59
    pub minute: u8,
    /// 0-59
    pub second: u8,
    /// Monday = 0 ... Sunday = 6
    pub weekday: u8,
}

impl LocalTime {
    /// Break down local Unix seconds (time-zone offset already applied)
    pub fn from_unix(seconds: i64) -> Option<Self> {
        let datetime = DateTime::from_timestamp(seconds, 0)?;
        Some(Self {
            hour: datetime.hour() as u8,
            minute: datetime.minute() as u8,
            second: datetime.second() as u8,
            weekday: datetime.weekday().num_days_from_monday() as u8,
        })
    }
}

/// Wall clock anchored to the monotonic uptime counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WallClock {
    anchor: Option<Anchor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
struct Anchor {
    unix_seconds: i64,
    at_ms: u32,
}

impl WallClock {
    /// Clock with no time committed
    pub const fn new() -> Self {
        Self { anchor: None }
    }

    /// Commit a new time as of `now_ms`
    pub fn set(&mut self, unix_seconds: i64, now_ms: u32) {
        self.anchor = Some(Anchor {
            unix_seconds,
            at_ms: now_ms,
        });
    }

    /// Whether any time has been committed
    pub fn is_set(&self) -> bool {
        self.anchor.is_some()
    }

    /// Current local Unix seconds
    pub fn now(&self, now_ms: u32) -> Option<i64> {
        self.anchor.map(|anchor| {
            let elapsed_ms = now_ms.wrapping_sub(anchor.at_ms);
            anchor.unix_seconds + i64::from(elapsed_ms / 1000)
        })
    }

    /// Current local time fields
    pub fn local(&self, now_ms: u32) -> Option<LocalTime> {
        self.now(now_ms).and_then(LocalTime::from_unix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_clock_reads_unknown() {
        let clock = WallClock::new();
        assert!(!clock.is_set());
        assert_eq!(clock.now(1234), None);
        assert_eq!(clock.local(1234), None);
    }

    #[test]
    fn test_clock_advances_with_uptime() {
        let mut clock = WallClock::new();
        clock.set(1_704_070_800, 10_000);
        assert_eq!(clock.now(10_999), Some(1_704_070_800));
        assert_eq!(clock.now(71_000), Some(1_704_070_861));
    }

    #[test]
    fn test_clock_survives_uptime_wrap() {
        let mut clock = WallClock::new();
        clock.set(1_000, u32::MAX - 499);
        assert_eq!(clock.now(1_500), Some(1_002));
    }

    #[test]
    fn test_local_time_fields() {
        // 2024-01-01T01:00:00 was a Monday
        let local = LocalTime::from_unix(1_704_070_800).unwrap();
        assert_eq!(local.hour, 1);
        assert_eq!(local.minute, 0);
        assert_eq!(local.second, 0);
        assert_eq!(local.weekday, 0);

        // 2024-01-07T23:59:30 was a Sunday
        let local = LocalTime::from_unix(1_704_671_970).unwrap();
        assert_eq!((local.hour, local.minute, local.second), (23, 59, 30));
        assert_eq!(local.weekday, 6);
    }
}
