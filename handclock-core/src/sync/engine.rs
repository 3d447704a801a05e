//! Time sync driver
//!
//! Owns the resolver, the socket and the wall clock, and runs the I/O that
//! [`SyncMachine`] asks for. One call to [`SyncEngine::tick`] performs at
//! most one resolve-and-send or one non-blocking receive.

use core::net::{IpAddr, SocketAddr};

use handclock_hal::{DatagramSocket, Resolver};
use handclock_protocol::{ntp, NtpResponse, NTP_PACKET_SIZE, NTP_PORT};
use heapless::String;

use super::machine::{SyncEffect, SyncEvent, SyncMachine, SyncState};
use crate::time::WallClock;

/// Upper bound on stale datagrams discarded before a request
pub const MAX_DRAIN: usize = 16;

/// Longest accepted server host name
pub const SERVER_NAME_CAPACITY: usize = 64;

/// Server host name storage
pub type ServerName = String<SERVER_NAME_CAPACITY>;

/// What one `tick` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncOutcome {
    /// Nothing due
    Idle,
    /// A request went out
    RequestSent,
    /// Still waiting for the reply
    Waiting,
    /// Reply received and committed
    Synced { unix_seconds: i64 },
    /// Reply never came
    TimedOut,
    /// Server name did not resolve
    ResolveFailed,
    /// Request could not be sent
    SendFailed,
}

/// Polling time sync engine
pub struct SyncEngine<R, S> {
    resolver: R,
    socket: S,
    server: ServerName,
    server_addr: Option<IpAddr>,
    machine: SyncMachine,
    clock: WallClock,
}

impl<R: Resolver, S: DatagramSocket> SyncEngine<R, S> {
    /// Create an engine; nothing is resolved or sent yet
    pub fn new(resolver: R, socket: S, server: ServerName, timezone_hours: i8) -> Self {
        Self {
            resolver,
            socket,
            server,
            server_addr: None,
            machine: SyncMachine::new(timezone_hours),
            clock: WallClock::new(),
        }
    }

    /// Resolve the server once at startup
    ///
    /// Failure is logged and left for the first `tick` to retry.
    pub fn start(&mut self) -> Option<IpAddr> {
        match self.resolver.resolve(&self.server) {
            Ok(addr) => {
                info!("NTP server {} resolved", self.server.as_str());
                self.server_addr = Some(addr);
            }
            Err(_) => {
                warn!("Failed to resolve NTP server {}", self.server.as_str());
                self.server_addr = None;
            }
        }
        self.server_addr
    }

    /// Advance the sync cycle; never blocks beyond one poll
    pub fn tick(&mut self, now_ms: u32) -> SyncOutcome {
        match self.machine.state() {
            SyncState::Idle => self.tick_idle(now_ms),
            SyncState::WaitingResponse { .. } => self.tick_waiting(now_ms),
        }
    }

    fn tick_idle(&mut self, now_ms: u32) -> SyncOutcome {
        if self.apply(SyncEvent::Tick { now_ms }) != SyncEffect::StartRequest {
            return SyncOutcome::Idle;
        }

        // Pool servers rotate, so resolve on every cycle
        let addr = match self.resolver.resolve(&self.server) {
            Ok(addr) => addr,
            Err(_) => {
                warn!("Failed to resolve NTP server {}", self.server.as_str());
                self.server_addr = None;
                self.apply(SyncEvent::ResolveFailed { now_ms });
                return SyncOutcome::ResolveFailed;
            }
        };
        self.server_addr = Some(addr);

        self.drain();

        let request = ntp::request();
        match self.socket.send_to(&request, SocketAddr::new(addr, NTP_PORT)) {
            Ok(()) => {
                debug!("NTP request sent");
                self.apply(SyncEvent::RequestSent { now_ms });
                SyncOutcome::RequestSent
            }
            Err(_) => {
                warn!("Failed to send NTP request");
                self.apply(SyncEvent::SendFailed { now_ms });
                SyncOutcome::SendFailed
            }
        }
    }

    fn tick_waiting(&mut self, now_ms: u32) -> SyncOutcome {
        let mut buf = [0u8; NTP_PACKET_SIZE];

        let event = match self.socket.try_recv(&mut buf) {
            Ok(Some(len)) if len >= NTP_PACKET_SIZE => match NtpResponse::parse(&buf) {
                Ok(response) => SyncEvent::ResponseReceived { now_ms, response },
                Err(_) => SyncEvent::Tick { now_ms },
            },
            Ok(Some(len)) => {
                debug!("Ignoring {} byte datagram", len);
                SyncEvent::Tick { now_ms }
            }
            Ok(None) => SyncEvent::Tick { now_ms },
            Err(_) => {
                debug!("NTP receive error");
                SyncEvent::Tick { now_ms }
            }
        };

        match self.apply(event) {
            SyncEffect::Commit { unix_seconds } => {
                self.clock.set(unix_seconds, now_ms);
                info!("Time synced: {}", unix_seconds);
                SyncOutcome::Synced { unix_seconds }
            }
            SyncEffect::TimedOut => {
                warn!("NTP response timeout");
                SyncOutcome::TimedOut
            }
            _ => SyncOutcome::Waiting,
        }
    }

    /// Discard anything that arrived while idle
    fn drain(&mut self) {
        let mut scratch = [0u8; NTP_PACKET_SIZE];
        for _ in 0..MAX_DRAIN {
            match self.socket.try_recv(&mut scratch) {
                Ok(Some(_)) => {}
                _ => break,
            }
        }
    }

    fn apply(&mut self, event: SyncEvent) -> SyncEffect {
        let (machine, effect) = self.machine.step(event);
        self.machine = machine;
        effect
    }

    /// Force a fresh request on the next `tick`
    pub fn request_resync(&mut self) {
        self.apply(SyncEvent::ResyncRequested);
    }

    /// Change the offset applied to future replies
    pub fn set_timezone(&mut self, timezone_hours: i8) {
        self.machine.set_timezone(timezone_hours);
    }

    /// Offset applied to replies
    pub fn timezone(&self) -> i8 {
        self.machine.timezone()
    }

    /// Server host name
    pub fn server(&self) -> &str {
        &self.server
    }

    /// Replace the server host name; takes effect on the next cycle
    pub fn set_server(&mut self, server: ServerName) {
        self.server = server;
        self.server_addr = None;
    }

    /// Address from the most recent successful resolution
    pub fn server_addr(&self) -> Option<IpAddr> {
        self.server_addr
    }

    /// Commit a time from another source (browser, RTC)
    pub fn set_time(&mut self, unix_seconds: i64, now_ms: u32) {
        self.clock.set(unix_seconds, now_ms);
    }

    /// The wall clock this engine maintains
    pub fn wall_clock(&self) -> &WallClock {
        &self.clock
    }

    /// Sync state
    pub fn machine(&self) -> &SyncMachine {
        &self.machine
    }

    /// Borrow the socket
    pub fn socket(&self) -> &S {
        &self.socket
    }

    /// Mutably borrow the socket
    pub fn socket_mut(&mut self) -> &mut S {
        &mut self.socket
    }
}
