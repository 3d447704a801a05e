//! Main control loop
//!
//! [`ClockApp::poll`] is one loop iteration: keep the time source current,
//! then decide whether the display should be parked, left alone or moved
//! to a new time.

use core::net::IpAddr;

use embedded_hal::delay::DelayNs;
use handclock_hal::{DatagramSocket, Housekeeping, I2cBus, Resolver};

use crate::config::{ClockConfig, ConnectionMode};
use crate::controller::{DisplayController, DisplayError};
use crate::sync::{SyncEngine, SyncOutcome};

/// What the display did during one poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayAction {
    /// Mode is off; hands parked
    Off,
    /// Sleep schedule active; hands parked
    Asleep,
    /// No time yet; nothing shown
    TimeUnknown,
    /// Same minute as last shown
    Unchanged,
    /// New time shown
    Shown { hour: u8, minute: u8 },
    /// Animation refused the time
    Rejected(DisplayError),
}

/// Result of one poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollOutcome {
    /// Sync step, when the time comes from the network
    pub sync: Option<SyncOutcome>,
    pub display: DisplayAction,
}

/// The clock: configuration, display and time source
pub struct ClockApp<B, R, S> {
    config: ClockConfig,
    display: DisplayController<B>,
    sync: SyncEngine<R, S>,
    last_shown: Option<(u8, u8)>,
}

impl<B, R, S> ClockApp<B, R, S>
where
    B: I2cBus,
    R: Resolver,
    S: DatagramSocket,
{
    pub fn new(bus: B, resolver: R, socket: S, config: ClockConfig) -> Self {
        let sync = SyncEngine::new(
            resolver,
            socket,
            config.ntp_server.clone(),
            config.timezone_hours,
        );

        Self {
            config,
            display: DisplayController::new(bus),
            sync,
            last_shown: None,
        }
    }

    /// Startup work; resolves the time server when on an external network
    pub fn start(&mut self) -> Option<IpAddr> {
        match self.config.connection {
            ConnectionMode::External => self.sync.start(),
            ConnectionMode::Hotspot => None,
        }
    }

    /// Replace the configuration
    ///
    /// Time-zone changes are picked up by the next `poll`. A new server name
    /// forces a fresh sync; a new mode redraws on the next `poll`.
    pub fn apply_config(&mut self, config: ClockConfig) {
        if config.ntp_server != self.config.ntp_server {
            info!("NTP server changed to {}", config.ntp_server.as_str());
            self.sync.set_server(config.ntp_server.clone());
            self.sync.request_resync();
        }
        if config.mode != self.config.mode {
            self.last_shown = None;
        }
        self.config = config;
    }

    /// Set the time from the browser (hotspot mode only)
    ///
    /// Returns `false` and ignores the time on an external network, where
    /// NTP owns the clock.
    pub fn set_manual_time(&mut self, unix_seconds: i64, now_ms: u32) -> bool {
        match self.config.connection {
            ConnectionMode::Hotspot => {
                self.sync.set_time(unix_seconds, now_ms);
                true
            }
            ConnectionMode::External => false,
        }
    }

    /// One loop iteration
    pub fn poll<D, H>(&mut self, now_ms: u32, delay: &mut D, housekeeping: &mut H) -> PollOutcome
    where
        D: DelayNs,
        H: Housekeeping,
    {
        let sync = match self.config.connection {
            ConnectionMode::External => {
                if self.config.timezone_hours != self.sync.timezone() {
                    info!("Timezone changed to {}", self.config.timezone_hours);
                    self.sync.set_timezone(self.config.timezone_hours);
                    self.sync.request_resync();
                }
                Some(self.sync.tick(now_ms))
            }
            ConnectionMode::Hotspot => None,
        };

        let display = self.update_display(now_ms, delay, housekeeping);
        PollOutcome { sync, display }
    }

    fn update_display<D, H>(&mut self, now_ms: u32, delay: &mut D, housekeeping: &mut H) -> DisplayAction
    where
        D: DelayNs,
        H: Housekeeping,
    {
        let Some(animation) = self.config.mode.animation() else {
            self.park();
            return DisplayAction::Off;
        };

        let Some(local) = self.sync.wall_clock().local(now_ms) else {
            return DisplayAction::TimeUnknown;
        };

        if self.config.sleep.is_asleep(local.weekday, local.hour) {
            self.park();
            return DisplayAction::Asleep;
        }

        let now = (local.hour, local.minute);
        if self.last_shown == Some(now) {
            return DisplayAction::Unchanged;
        }

        self.last_shown = Some(now);
        match animation.play(&mut self.display, delay, housekeeping, local.hour, local.minute) {
            Ok(()) => DisplayAction::Shown {
                hour: local.hour,
                minute: local.minute,
            },
            Err(error) => DisplayAction::Rejected(error),
        }
    }

    fn park(&mut self) {
        if self.display.stop().is_some() {
            debug!("Display parked");
        }
        self.last_shown = None;
    }

    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    pub fn display(&self) -> &DisplayController<B> {
        &self.display
    }

    /// Direct display access (manual adjustment, profile tweaks)
    pub fn display_mut(&mut self) -> &mut DisplayController<B> {
        &mut self.display
    }

    pub fn sync(&self) -> &SyncEngine<R, S> {
        &self.sync
    }

    /// Time last drawn, if any
    pub fn last_shown(&self) -> Option<(u8, u8)> {
        self.last_shown
    }
}
