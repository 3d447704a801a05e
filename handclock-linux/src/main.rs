//! Handclock - 24-hand kinetic wall clock
//!
//! Control loop for a Linux single-board computer driving the 8 column
//! controllers over i2c-dev and keeping time over NTP.
//!
//! Usage: `handclock-linux [settings.toml]` (log level via `RUST_LOG`)

mod config;
mod host;

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use embedded_hal::delay::DelayNs;
use handclock_core::config::ConnectionMode;
use handclock_core::ClockApp;
use handclock_hal::{
    DatagramSocket, EmbeddedHalBus, Housekeeping, I2cBus, MonotonicClock, Resolver,
};
use linux_embedded_hal::{Delay, I2cdev};

use crate::config::{needs_host_seed, ConfigWatcher, Settings, DEFAULT_PATH};
use crate::host::{StdResolver, StdSocket, Uptime};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PATH));

    log::info!("Handclock starting with {}", path.display());
    let settings = Settings::load(&path)?;

    let i2c = I2cdev::new(&settings.i2c_device)
        .with_context(|| format!("opening {}", settings.i2c_device))?;
    let socket = StdSocket::bind(settings.local_port)?;

    let uptime = Uptime::new();
    let mut delay = Delay;
    let mut watcher = ConfigWatcher::new(&path);

    let mut app = ClockApp::new(
        EmbeddedHalBus::new(i2c),
        StdResolver,
        socket,
        settings.clock.clone(),
    );

    match settings.clock.connection {
        ConnectionMode::External => {
            app.start();
        }
        ConnectionMode::Hotspot => {
            // No browser here; the host clock stands in for it
            seed_host_time(&mut app, &uptime)?;
        }
    }

    loop {
        let outcome = app.poll(uptime.now_ms(), &mut delay, &mut watcher);
        log::trace!("{:?}", outcome);

        watcher.service();
        if let Some(clock) = watcher.take() {
            let reseed = needs_host_seed(app.config(), &clock);
            app.apply_config(clock);
            if reseed {
                if let Err(e) = seed_host_time(&mut app, &uptime) {
                    log::warn!("Hotspot time not reseeded: {:#}", e);
                }
            }
        }

        delay.delay_ms(settings.loop_interval_ms);
    }
}

/// Set hotspot time from the host clock in the configured time zone
fn seed_host_time<B, R, S>(app: &mut ClockApp<B, R, S>, uptime: &Uptime) -> anyhow::Result<()>
where
    B: I2cBus,
    R: Resolver,
    S: DatagramSocket,
{
    let offset = i64::from(app.config().timezone_hours) * 3600;
    let local = system_unix_seconds()? + offset;
    app.set_manual_time(local, uptime.now_ms());
    Ok(())
}

fn system_unix_seconds() -> anyhow::Result<i64> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock before 1970")?;
    Ok(elapsed.as_secs() as i64)
}
