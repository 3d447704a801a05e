//! Network abstractions
//!
//! Only what the time sync needs: resolving a server name and exchanging
//! datagrams without blocking.

use core::net::{IpAddr, SocketAddr};

/// Host name resolution
///
/// Resolution may block briefly (a DNS round trip on the local network).
/// Callers only resolve at startup and right before sending a request.
pub trait Resolver {
    /// Error type for failed lookups
    type Error;

    /// Resolve `host` to a single address
    fn resolve(&mut self, host: &str) -> Result<IpAddr, Self::Error>;
}

/// Non-blocking datagram socket
pub trait DatagramSocket {
    /// Error type for socket operations
    type Error;

    /// Send one datagram to `addr`
    fn send_to(&mut self, data: &[u8], addr: SocketAddr) -> Result<(), Self::Error>;

    /// Receive one pending datagram, if any
    ///
    /// Returns `Ok(Some(len))` with the datagram length (which may exceed
    /// `buf.len()`; the excess is dropped), or `Ok(None)` when nothing is
    /// waiting. Must never block.
    fn try_recv(&mut self, buf: &mut [u8]) -> Result<Option<usize>, Self::Error>;
}
