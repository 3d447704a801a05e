//! Animation scripts
//!
//! Each script is a short sequence of display commands with a motion
//! profile per step. Long pauses go through [`wait`], which sleeps in
//! 100 ms slices and services pending work before each slice.

use embedded_hal::delay::DelayNs;
use handclock_hal::{Housekeeping, I2cBus};

use crate::controller::{DisplayController, DisplayError};
use crate::encoder::{Direction, Profile};
use crate::glyph;
use crate::layout::Slot;

/// Longest uninterrupted sleep inside an animation
pub const WAIT_SLICE_MS: u32 = 100;

/// Pause between the bars and the time in the waves script
pub const WAVES_HOLD_MS: u32 = 9000;

/// Pause after each column in the waves script
pub const WAVES_STEP_MS: u32 = 400;

const LAZY: Profile = Profile::new(200, 100, Direction::ShortestPath);
const FUN: Profile = Profile::new(400, 150, Direction::Clockwise);
const WAVES_BARS: Profile = Profile::new(800, 150, Direction::ShortestPath);
const WAVES_TIME: Profile = Profile::new(400, 100, Direction::Clockwise);

/// How a new time is brought onto the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Animation {
    /// Straight to the new time, shortest way round
    Lazy,
    /// Straight to the new time, clockwise and a little faster
    Fun,
    /// Bars first, then the time column by column
    Waves,
}

impl Animation {
    /// Run the script for `hours:minutes`
    pub fn play<B, D, H>(
        self,
        controller: &mut DisplayController<B>,
        delay: &mut D,
        housekeeping: &mut H,
        hours: u8,
        minutes: u8,
    ) -> Result<(), DisplayError>
    where
        B: I2cBus,
        D: DelayNs,
        H: Housekeeping,
    {
        match self {
            Animation::Lazy => lazy(controller, hours, minutes),
            Animation::Fun => fun(controller, hours, minutes),
            Animation::Waves => waves(controller, delay, housekeeping, hours, minutes),
        }
    }
}

/// Sleep `ms`, servicing `housekeeping` at least every [`WAIT_SLICE_MS`]
pub fn wait<D: DelayNs, H: Housekeeping>(delay: &mut D, housekeeping: &mut H, ms: u32) {
    let mut remaining = ms;
    while remaining > 0 {
        housekeeping.service();
        let slice = remaining.min(WAIT_SLICE_MS);
        delay.delay_ms(slice);
        remaining -= slice;
    }
}

pub fn lazy<B: I2cBus>(
    controller: &mut DisplayController<B>,
    hours: u8,
    minutes: u8,
) -> Result<(), DisplayError> {
    controller.set_profile(LAZY);
    controller.show(hours, minutes).map(|_| ())
}

pub fn fun<B: I2cBus>(
    controller: &mut DisplayController<B>,
    hours: u8,
    minutes: u8,
) -> Result<(), DisplayError> {
    controller.set_profile(FUN);
    controller.show(hours, minutes).map(|_| ())
}

pub fn waves<B, D, H>(
    controller: &mut DisplayController<B>,
    delay: &mut D,
    housekeeping: &mut H,
    hours: u8,
    minutes: u8,
) -> Result<(), DisplayError>
where
    B: I2cBus,
    D: DelayNs,
    H: Housekeeping,
{
    let target = glyph::time_glyph(hours, minutes).ok_or(DisplayError::TimeOutOfRange)?;

    controller.set_profile(WAVES_BARS);
    controller.show_glyph(&glyph::BARS);
    wait(delay, housekeeping, WAVES_HOLD_MS);

    info!("Set time: {}:{}", hours, minutes);
    controller.set_profile(WAVES_TIME);
    for slot in Slot::ALL {
        controller.show_half(slot.index() as u8, target.half(slot))?;
        wait(delay, housekeeping, WAVES_STEP_MS);
    }

    Ok(())
}
