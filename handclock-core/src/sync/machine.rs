//! Time sync state machine
//!
//! Pure transition logic: `(machine, event) -> (machine, effect)`. The
//! engine performs the I/O each effect asks for and feeds the result back
//! as the next event, so every path here is testable without a network.

use handclock_protocol::NtpResponse;

/// Time between successful (or abandoned) sync cycles
pub const SYNC_INTERVAL_MS: u32 = 30 * 60 * 1000;

/// How long to wait for a reply before abandoning the cycle
pub const RESPONSE_TIMEOUT_MS: u32 = 2000;

/// Where the sync cycle is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncState {
    /// No request outstanding
    Idle,
    /// Request sent, polling for the reply
    WaitingResponse {
        /// Uptime when the request went out
        sent_at_ms: u32,
    },
}

/// Inputs to the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncEvent {
    /// Loop iteration with nothing received
    Tick { now_ms: u32 },
    /// Server name did not resolve
    ResolveFailed { now_ms: u32 },
    /// Request could not be handed to the network stack
    SendFailed { now_ms: u32 },
    /// Request is on the wire
    RequestSent { now_ms: u32 },
    /// A full-size reply arrived
    ResponseReceived { now_ms: u32, response: NtpResponse },
    /// Drop whatever is in flight and sync on the next tick
    ResyncRequested,
}

/// What the engine must do after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncEffect {
    /// Nothing
    None,
    /// Resolve the server, drain stale datagrams, send a request
    StartRequest,
    /// Commit this local Unix time to the wall clock
    Commit { unix_seconds: i64 },
    /// Reply never came; cycle abandoned
    TimedOut,
    /// Cycle failed before sending; waiting a full interval
    BackedOff,
}

/// Sync state plus the bookkeeping that drives it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SyncMachine {
    state: SyncState,
    last_sync_ms: Option<u32>,
    timezone_hours: i8,
}

impl SyncMachine {
    /// Idle machine that has never synced
    pub const fn new(timezone_hours: i8) -> Self {
        Self {
            state: SyncState::Idle,
            last_sync_ms: None,
            timezone_hours,
        }
    }

    /// Current state
    pub const fn state(&self) -> SyncState {
        self.state
    }

    /// Uptime of the last completed cycle (success or failure)
    pub const fn last_sync_ms(&self) -> Option<u32> {
        self.last_sync_ms
    }

    /// Whole-hour offset applied to received times
    pub const fn timezone(&self) -> i8 {
        self.timezone_hours
    }

    /// Change the offset applied to future replies
    pub fn set_timezone(&mut self, timezone_hours: i8) {
        self.timezone_hours = timezone_hours;
    }

    /// Whether a new cycle should start at `now_ms`
    pub fn is_due(&self, now_ms: u32) -> bool {
        match self.last_sync_ms {
            None => true,
            Some(last) => now_ms.wrapping_sub(last) >= SYNC_INTERVAL_MS,
        }
    }

    /// Apply one event
    pub fn step(self, event: SyncEvent) -> (Self, SyncEffect) {
        use SyncEvent::*;
        use SyncState::*;

        match (self.state, event) {
            (_, ResyncRequested) => (
                Self {
                    state: Idle,
                    last_sync_ms: None,
                    ..self
                },
                SyncEffect::None,
            ),

            (Idle, Tick { now_ms }) if self.is_due(now_ms) => (self, SyncEffect::StartRequest),

            (Idle, ResolveFailed { now_ms }) | (Idle, SendFailed { now_ms }) => {
                (self.completed(now_ms), SyncEffect::BackedOff)
            }

            (Idle, RequestSent { now_ms }) => (
                Self {
                    state: WaitingResponse { sent_at_ms: now_ms },
                    ..self
                },
                SyncEffect::None,
            ),

            (WaitingResponse { .. }, ResponseReceived { now_ms, response }) => (
                self.completed(now_ms),
                SyncEffect::Commit {
                    unix_seconds: response.unix_seconds(self.timezone_hours),
                },
            ),

            (WaitingResponse { sent_at_ms }, Tick { now_ms })
                if now_ms.wrapping_sub(sent_at_ms) > RESPONSE_TIMEOUT_MS =>
            {
                (self.completed(now_ms), SyncEffect::TimedOut)
            }

            // Default: stay in current state
            _ => (self, SyncEffect::None),
        }
    }

    fn completed(self, now_ms: u32) -> Self {
        Self {
            state: SyncState::Idle,
            last_sync_ms: Some(now_ms),
            ..self
        }
    }
}
