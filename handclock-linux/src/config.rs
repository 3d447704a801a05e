//! Runner settings
//!
//! One TOML file holds the host settings (I2C device, UDP port, loop
//! period) and a `[clock]` table with the core [`ClockConfig`]. The file
//! is watched while running; edits to `[clock]` reach the control loop
//! without a restart.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{anyhow, Context};
use handclock_core::config::{ClockConfig, ConnectionMode};
use handclock_hal::Housekeeping;
use serde::{Deserialize, Serialize};

/// Settings file used when none is given on the command line
pub const DEFAULT_PATH: &str = "handclock.toml";

/// Host settings plus the clock configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// i2c-dev node the column controllers hang off
    pub i2c_device: String,
    /// Local UDP port for NTP replies
    pub local_port: u16,
    /// Pause between loop iterations
    pub loop_interval_ms: u32,
    pub clock: ClockConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            i2c_device: "/dev/i2c-1".into(),
            local_port: 8888,
            loop_interval_ms: 20,
            clock: ClockConfig::default(),
        }
    }
}

impl Settings {
    /// Parse and validate settings text
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let settings: Settings = toml::from_str(text).context("invalid settings file")?;
        settings
            .clock
            .validate()
            .map_err(|e| anyhow!("invalid [clock] table: {:?}", e))?;
        Ok(settings)
    }

    /// Load settings; a missing file gives the defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => {
                Self::parse(&text).with_context(|| format!("loading {}", path.display()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }
}

/// Reloads the settings file when its modification time changes
///
/// Serviced from the control loop and from inside long animations; the
/// newest valid clock configuration waits in [`take`](Self::take) until
/// the loop applies it.
pub struct ConfigWatcher {
    path: PathBuf,
    modified: Option<SystemTime>,
    pending: Option<ClockConfig>,
}

impl ConfigWatcher {
    /// Watch `path`, treating its current contents as already applied
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let modified = modified_time(&path);
        Self {
            path,
            modified,
            pending: None,
        }
    }

    /// Reload if the file changed since the last check
    pub fn check(&mut self) {
        let modified = modified_time(&self.path);
        if modified == self.modified {
            return;
        }
        self.modified = modified;

        match Settings::load(&self.path) {
            Ok(settings) => {
                log::info!("Reloaded {}", self.path.display());
                self.pending = Some(settings.clock);
            }
            Err(e) => log::warn!("Keeping previous configuration: {:#}", e),
        }
    }

    /// Configuration loaded since the last call, if any
    pub fn take(&mut self) -> Option<ClockConfig> {
        self.pending.take()
    }
}

impl Housekeeping for ConfigWatcher {
    fn service(&mut self) {
        self.check();
    }
}

/// Whether a reload leaves a hotspot clock seeded with the wrong offset
///
/// The host clock seeds hotspot time in local terms, so switching into
/// hotspot mode or changing the time zone while in it needs a fresh seed.
pub fn needs_host_seed(previous: &ClockConfig, next: &ClockConfig) -> bool {
    next.connection == ConnectionMode::Hotspot
        && (previous.connection != ConnectionMode::Hotspot
            || previous.timezone_hours != next.timezone_hours)
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}
