//! Configuration type definitions

use crate::animation::Animation;
use crate::sync::ServerName;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Offset applied until configured otherwise
pub const DEFAULT_TIMEZONE_HOURS: i8 = 1;

/// Time server used until configured otherwise
pub const DEFAULT_NTP_SERVER: &str = "pool.ntp.org";

/// Accepted whole-hour offsets
pub const TIMEZONE_RANGE: core::ops::RangeInclusive<i8> = -12..=14;

/// Days in the sleep schedule
pub const DAYS_PER_WEEK: usize = 7;

/// What the display does while awake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ClockMode {
    /// Hands parked
    Off,
    #[default]
    Lazy,
    Fun,
    Waves,
}

impl ClockMode {
    /// Script used to show a new time; `None` when off
    pub const fn animation(self) -> Option<Animation> {
        match self {
            ClockMode::Off => None,
            ClockMode::Lazy => Some(Animation::Lazy),
            ClockMode::Fun => Some(Animation::Fun),
            ClockMode::Waves => Some(Animation::Waves),
        }
    }
}

/// Where the time comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConnectionMode {
    /// Own access point; time set from a browser
    Hotspot,
    /// Joined network; time from NTP
    #[default]
    External,
}

/// Hours the display sleeps, one 24-bit mask per weekday (Monday first)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SleepSchedule {
    days: [u32; DAYS_PER_WEEK],
}

impl SleepSchedule {
    /// Never asleep
    pub const fn awake() -> Self {
        Self {
            days: [0; DAYS_PER_WEEK],
        }
    }

    /// Schedule from raw per-day masks (bit `n` = hour `n`)
    pub const fn from_masks(days: [u32; DAYS_PER_WEEK]) -> Self {
        Self { days }
    }

    /// Whether the display sleeps during `hour` (0-23) of `weekday` (0 = Monday)
    pub fn is_asleep(&self, weekday: u8, hour: u8) -> bool {
        if hour >= 24 {
            return false;
        }
        self.days
            .get(weekday as usize)
            .is_some_and(|mask| mask & (1 << hour) != 0)
    }

    /// Mark one hour asleep or awake; out-of-range values are ignored
    pub fn set(&mut self, weekday: u8, hour: u8, asleep: bool) {
        if hour >= 24 {
            return;
        }
        if let Some(mask) = self.days.get_mut(weekday as usize) {
            if asleep {
                *mask |= 1 << hour;
            } else {
                *mask &= !(1 << hour);
            }
        }
    }

    /// Raw mask for one day
    pub fn mask(&self, weekday: u8) -> u32 {
        self.days.get(weekday as usize).copied().unwrap_or(0)
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Offset outside -12..=14 hours
    TimezoneOutOfRange,
    /// Empty time server name
    EmptyServer,
}

/// Everything the control loop is configured by
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClockConfig {
    pub mode: ClockMode,
    pub connection: ConnectionMode,
    /// Whole hours added to UTC
    pub timezone_hours: i8,
    /// NTP server host name
    pub ntp_server: ServerName,
    pub sleep: SleepSchedule,
}

impl ClockConfig {
    /// Check ranges the type system does not
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !TIMEZONE_RANGE.contains(&self.timezone_hours) {
            return Err(ConfigError::TimezoneOutOfRange);
        }
        if self.ntp_server.is_empty() {
            return Err(ConfigError::EmptyServer);
        }
        Ok(())
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        let mut ntp_server = ServerName::new();
        // Fits: the default name is well under capacity
        let _ = ntp_server.push_str(DEFAULT_NTP_SERVER);

        Self {
            mode: ClockMode::default(),
            connection: ConnectionMode::default(),
            timezone_hours: DEFAULT_TIMEZONE_HOURS,
            ntp_server,
            sleep: SleepSchedule::awake(),
        }
    }
}
