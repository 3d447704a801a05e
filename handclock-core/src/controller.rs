//! Display controller
//!
//! Pushes rendered commands to the 8 column controllers, in slot order,
//! one I2C write per column. Owns the process-wide display state: motion
//! profile, freshness counter, the last command sent to each column and
//! whether the display is parked.
//!
//! Every public operation is one logical command: all the columns it
//! touches carry the same marker, and the counter advances once afterwards.
//! A failed column is logged and reported but never stops the others.

use handclock_hal::{BusError, I2cBus};
use handclock_protocol::{HandPair, Marker};
use heapless::Vec;

use crate::encoder::{self, Direction, FreshnessCounter, FullDisplay, Profile};
use crate::glyph::{self, DisplayGlyph, HalfGlyph};
use crate::layout::{HandIndex, Slot, SLOT_COUNT};

/// Rejected display requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Hours or minutes above 99
    TimeOutOfRange,
    /// Column index above 7
    SlotOutOfRange,
    /// Movement index above 23
    HandOutOfRange,
}

/// A column that did not take its command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SlotFailure {
    pub slot: Slot,
    pub error: BusError,
}

/// Per-column outcome of one command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    failures: Vec<SlotFailure, SLOT_COUNT>,
}

impl DeliveryReport {
    /// Every addressed column acknowledged
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Columns that failed, in transmission order
    pub fn failures(&self) -> &[SlotFailure] {
        &self.failures
    }

    fn record(&mut self, slot: Slot, error: BusError) {
        // At most one entry per slot, so this never overflows
        let _ = self.failures.push(SlotFailure { slot, error });
    }
}

/// Mutable display state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayState {
    /// Profile applied to the next render
    pub profile: Profile,
    /// Marker source
    pub counter: FreshnessCounter,
    /// Last command sent to each column
    pub last_sent: [HandPair; SLOT_COUNT],
    /// Rest pattern sent and nothing since
    pub stopped: bool,
}

/// Display controller over an I2C bus
pub struct DisplayController<B> {
    bus: B,
    state: DisplayState,
}

impl<B: I2cBus> DisplayController<B> {
    /// Controller with the default profile and nothing sent
    pub fn new(bus: B) -> Self {
        Self {
            bus,
            state: DisplayState::default(),
        }
    }

    /// Show `hours:minutes` (each 0-99)
    pub fn show(&mut self, hours: u8, minutes: u8) -> Result<DeliveryReport, DisplayError> {
        let display = encoder::render_time(hours, minutes, &self.state.profile, self.marker())
            .ok_or(DisplayError::TimeOutOfRange)?;

        info!("Set time: {}:{}", hours, minutes);
        Ok(self.send_display(&display))
    }

    /// Show an arbitrary full pattern
    pub fn show_glyph(&mut self, glyph: &DisplayGlyph) -> DeliveryReport {
        let display = encoder::render_glyph(glyph, &self.state.profile, self.marker());
        self.send_display(&display)
    }

    /// Show a pattern on a single column
    pub fn show_half(&mut self, slot: u8, half: &HalfGlyph) -> Result<DeliveryReport, DisplayError> {
        let slot = Slot::new(slot).ok_or(DisplayError::SlotOutOfRange)?;
        let pair = encoder::expand(half, &self.state.profile, self.marker());

        let mut report = DeliveryReport::default();
        self.send(slot, &pair, &mut report);
        self.state.last_sent[slot.index()] = pair;
        self.finish();
        Ok(report)
    }

    /// Nudge one movement (0-23) by signed hour/minute offsets
    ///
    /// The other two movements of the column are resent with their last
    /// targets. The cache keeps those targets; only its marker moves on, so
    /// a later adjust on a sibling does not replay this offset. A parked
    /// display stays parked.
    pub fn adjust(
        &mut self,
        hand: u8,
        hour_offset: i32,
        minute_offset: i32,
    ) -> Result<DeliveryReport, DisplayError> {
        let hand = HandIndex::new(hand).ok_or(DisplayError::HandOutOfRange)?;
        let marker = self.marker();
        let slot = hand.slot();
        let pair = encoder::render_adjust(
            &self.state.last_sent,
            hand,
            hour_offset,
            minute_offset,
            marker,
        );

        debug!(
            "Adjust hand {}: {} {}",
            hand.index() as u8,
            hour_offset,
            minute_offset
        );

        let mut report = DeliveryReport::default();
        self.send(slot, &pair, &mut report);
        self.state.last_sent[slot.index()].set_marker(marker);
        // Calibrating a parked clock leaves it parked
        self.state.counter.advance();
        Ok(report)
    }

    /// Park every hand at rest
    ///
    /// Only the first call after something was shown touches the bus;
    /// repeat calls return `None`.
    pub fn stop(&mut self) -> Option<DeliveryReport> {
        if self.state.stopped {
            return None;
        }

        self.state.profile = Profile::DEFAULT;
        let report = self.show_glyph(&glyph::REST);
        self.state.stopped = true;
        Some(report)
    }

    /// Set the speed for subsequent renders
    pub fn set_speed(&mut self, speed: u16) {
        self.state.profile.speed = speed;
    }

    /// Set the acceleration for subsequent renders
    pub fn set_acceleration(&mut self, acceleration: u16) {
        self.state.profile.acceleration = acceleration;
    }

    /// Set the direction for subsequent renders
    pub fn set_direction(&mut self, direction: Direction) {
        self.state.profile.direction = direction;
    }

    /// Replace the whole profile
    pub fn set_profile(&mut self, profile: Profile) {
        self.state.profile = profile;
    }

    /// Current profile
    pub fn profile(&self) -> Profile {
        self.state.profile
    }

    /// Last command sent to a column
    pub fn last_sent(&self, slot: Slot) -> &HandPair {
        &self.state.last_sent[slot.index()]
    }

    /// Whether the rest pattern is showing
    pub fn is_stopped(&self) -> bool {
        self.state.stopped
    }

    /// Full display state
    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    /// Borrow the bus
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Mutably borrow the bus
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Release the bus
    pub fn into_bus(self) -> B {
        self.bus
    }

    fn marker(&self) -> Marker {
        self.state.counter.current()
    }

    fn send_display(&mut self, display: &FullDisplay) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        for (slot, pair) in display.pairs() {
            self.send(slot, pair, &mut report);
            self.state.last_sent[slot.index()] = *pair;
        }
        self.finish();
        report
    }

    fn send(&mut self, slot: Slot, pair: &HandPair, report: &mut DeliveryReport) {
        if let Err(error) = self.bus.write(slot.address(), &pair.to_bytes()) {
            error!(
                "I2C error: board {} ({}) failed: {} (code {})",
                slot.address(),
                slot.role(),
                error.description(),
                error.code()
            );
            report.record(slot, error);
        }
    }

    fn finish(&mut self) {
        self.state.counter.advance();
        self.state.stopped = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::DIGITS;
    use crate::layout::Side;
    use handclock_protocol::{HandMode, MarkerGate, HAND_PAIR_WIRE_SIZE};

    /// Records every write; fails writes to one address
    #[derive(Default)]
    struct RecordingBus {
        writes: Vec<(u8, [u8; HAND_PAIR_WIRE_SIZE]), 32>,
        fail_address: Option<u8>,
    }

    impl I2cBus for RecordingBus {
        fn write(&mut self, address: u8, data: &[u8]) -> Result<(), BusError> {
            let mut payload = [0u8; HAND_PAIR_WIRE_SIZE];
            payload.copy_from_slice(data);
            self.writes.push((address, payload)).unwrap();
            if self.fail_address == Some(address) {
                Err(BusError::AddressNack)
            } else {
                Ok(())
            }
        }
    }

    fn sent_pair(bus: &RecordingBus, index: usize) -> HandPair {
        HandPair::decode(&bus.writes[index].1).unwrap()
    }

    #[test]
    fn test_show_writes_all_slots_in_order() {
        let mut controller = DisplayController::new(RecordingBus::default());
        let report = controller.show(12, 34).unwrap();

        assert!(report.is_complete());
        let addresses: Vec<u8, 8> = controller.bus().writes.iter().map(|w| w.0).collect();
        assert_eq!(addresses.as_slice(), &[1, 2, 3, 4, 5, 6, 7, 8]);

        for i in 0..SLOT_COUNT {
            let pair = sent_pair(controller.bus(), i);
            assert_eq!(pair.marker(), Marker::FIRST);
            assert_eq!(&pair, controller.last_sent(Slot::new(i as u8).unwrap()));
        }
    }

    #[test]
    fn test_failed_slot_does_not_block_others() {
        let bus = RecordingBus {
            fail_address: Some(3),
            ..Default::default()
        };
        let mut controller = DisplayController::new(bus);
        let report = controller.show(8, 15).unwrap();

        assert_eq!(controller.bus().writes.len(), SLOT_COUNT);
        assert_eq!(
            report.failures(),
            &[SlotFailure {
                slot: Slot::new(2).unwrap(),
                error: BusError::AddressNack,
            }]
        );
    }

    #[test]
    fn test_out_of_range_time_sends_nothing() {
        let mut controller = DisplayController::new(RecordingBus::default());
        assert_eq!(controller.show(100, 0), Err(DisplayError::TimeOutOfRange));
        assert_eq!(controller.show(0, 100), Err(DisplayError::TimeOutOfRange));
        assert!(controller.bus().writes.is_empty());
        assert_eq!(controller.state().counter.current(), Marker::FIRST);
    }

    #[test]
    fn test_marker_advances_once_per_command() {
        let mut controller = DisplayController::new(RecordingBus::default());
        controller.show(1, 2).unwrap();
        controller.show(1, 3).unwrap();
        controller.adjust(0, 1, 1).unwrap();

        let bus = controller.bus();
        assert_eq!(sent_pair(bus, 7).marker().get(), 1);
        assert_eq!(sent_pair(bus, 8).marker().get(), 2);
        assert_eq!(sent_pair(bus, 15).marker().get(), 2);
        assert_eq!(sent_pair(bus, 16).marker().get(), 3);
        assert_eq!(controller.state().counter.current().get(), 4);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut controller = DisplayController::new(RecordingBus::default());
        controller.set_speed(900);
        controller.set_direction(Direction::Clockwise);

        assert!(controller.stop().is_some());
        assert!(controller.stop().is_none());
        assert_eq!(controller.bus().writes.len(), SLOT_COUNT);
        assert!(controller.is_stopped());

        let pair = sent_pair(controller.bus(), 0);
        let hand = pair.hand(0).unwrap();
        assert_eq!(hand.speed, Profile::DEFAULT.speed);
        assert_eq!(hand.mode, HandMode::ShortestPath);
        assert_eq!(hand.angle_h, glyph::REST.half(Slot::new(0).unwrap()).0[0].h);
    }

    #[test]
    fn test_stop_rearms_after_show() {
        let mut controller = DisplayController::new(RecordingBus::default());
        controller.stop();
        controller.show(7, 45).unwrap();
        assert!(!controller.is_stopped());
        assert!(controller.stop().is_some());
        assert_eq!(controller.bus().writes.len(), 3 * SLOT_COUNT);
    }

    #[test]
    fn test_adjust_keeps_display_parked() {
        let mut controller = DisplayController::new(RecordingBus::default());
        controller.stop();
        controller.adjust(4, 1, -1).unwrap();

        assert!(controller.is_stopped());
        assert!(controller.stop().is_none());
        assert_eq!(controller.bus().writes.len(), SLOT_COUNT + 1);
        assert_eq!(controller.state().counter.current().get(), 3);
    }

    #[test]
    fn test_adjust_then_show_overwrites_slot() {
        let mut controller = DisplayController::new(RecordingBus::default());
        controller.show(10, 0).unwrap();
        let before = *controller.last_sent(Slot::new(1).unwrap());

        let report = controller.adjust(3, 2, -1).unwrap();
        assert!(report.is_complete());

        let adjust = sent_pair(controller.bus(), SLOT_COUNT);
        assert_eq!(controller.bus().writes[SLOT_COUNT].0, 2);
        assert_eq!(adjust.hand(1), before.hand(1));
        assert_eq!(adjust.hand(2), before.hand(2));
        let moved = adjust.hand(0).unwrap();
        assert_eq!(moved.mode, HandMode::Adjust);
        assert_eq!((moved.adjust_h, moved.adjust_m), (2, -1));

        // Cache keeps targets, takes the new marker
        let cached = controller.last_sent(Slot::new(1).unwrap());
        assert_eq!(cached.hands(), before.hands());
        assert_eq!(cached.marker(), adjust.marker());

        controller.show(8, 0).unwrap();
        let cached = controller.last_sent(Slot::new(1).unwrap());
        // 08:00 puts a 0 in the hours tens
        let expected = DIGITS[0].half(Side::Right).0[0];
        let hand = cached.hand(0).unwrap();
        assert_eq!((hand.angle_h, hand.angle_m), (expected.h, expected.m));
        assert_eq!(hand.mode, HandMode::ShortestPath);
        assert!(cached.marker() > adjust.marker());
    }

    #[test]
    fn test_peripherals_accept_every_command() {
        let mut controller = DisplayController::new(RecordingBus::default());
        controller.show(23, 59).unwrap();
        controller.adjust(5, -3, 4).unwrap();
        controller.stop();
        controller.show(0, 0).unwrap();
        controller.show_half(1, &DIGITS[7].0[1]).unwrap();

        let mut gates = [MarkerGate::new(); SLOT_COUNT];
        for (address, payload) in controller.bus().writes.iter() {
            let pair = HandPair::decode(payload).unwrap();
            let gate = &mut gates[*address as usize - 1];
            assert!(gate.accept(pair.marker()));
        }
    }

    #[test]
    fn test_adjust_rejects_bad_hand() {
        let mut controller = DisplayController::new(RecordingBus::default());
        assert_eq!(controller.adjust(24, 1, 1), Err(DisplayError::HandOutOfRange));
        assert!(controller.bus().writes.is_empty());
    }

    #[test]
    fn test_show_half_updates_one_slot() {
        let mut controller = DisplayController::new(RecordingBus::default());
        let half = *DIGITS[4].half(Side::Left);
        controller.show_half(5, &half).unwrap();

        assert_eq!(controller.bus().writes.len(), 1);
        assert_eq!(controller.bus().writes[0].0, 6);
        let cached = controller.last_sent(Slot::new(5).unwrap());
        assert_eq!(cached.hand(2).unwrap().angle_m, half.0[2].m);
        assert_eq!(
            controller.show_half(8, &half),
            Err(DisplayError::SlotOutOfRange)
        );
    }
}
