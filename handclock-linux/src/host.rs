//! std implementations of the HAL collaborator traits

use std::io;
use std::net::{IpAddr, SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::Instant;

use anyhow::Context;
use handclock_hal::{DatagramSocket, MonotonicClock, Resolver};
use handclock_protocol::NTP_PORT;

/// System DNS resolver (IPv4 answers only, to match the socket)
pub struct StdResolver;

impl Resolver for StdResolver {
    type Error = io::Error;

    fn resolve(&mut self, host: &str) -> Result<IpAddr, io::Error> {
        (host, NTP_PORT)
            .to_socket_addrs()?
            .map(|addr| addr.ip())
            .find(IpAddr::is_ipv4)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no IPv4 address"))
    }
}

/// Non-blocking UDP socket
pub struct StdSocket {
    socket: UdpSocket,
}

impl StdSocket {
    /// Bind on all interfaces at `port`
    pub fn bind(port: u16) -> anyhow::Result<Self> {
        let socket = UdpSocket::bind(("0.0.0.0", port))
            .with_context(|| format!("binding UDP port {}", port))?;
        socket
            .set_nonblocking(true)
            .context("setting UDP socket non-blocking")?;
        Ok(Self { socket })
    }
}

impl DatagramSocket for StdSocket {
    type Error = io::Error;

    fn send_to(&mut self, data: &[u8], addr: SocketAddr) -> Result<(), io::Error> {
        self.socket.send_to(data, addr).map(|_| ())
    }

    fn try_recv(&mut self, buf: &mut [u8]) -> Result<Option<usize>, io::Error> {
        match self.socket.recv_from(buf) {
            Ok((len, _)) => Ok(Some(len)),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Milliseconds since the runner started
pub struct Uptime {
    started: Instant,
}

impl Uptime {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl MonotonicClock for Uptime {
    fn now_ms(&self) -> u32 {
        // Truncation wraps like a hardware millisecond counter
        self.started.elapsed().as_millis() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_socket_loopback() {
        let mut a = StdSocket::bind(0).unwrap();
        let mut buf = [0u8; 64];
        assert_eq!(a.try_recv(&mut buf).unwrap(), None);

        let b = UdpSocket::bind("127.0.0.1:0").unwrap();
        let a_port = a.socket.local_addr().unwrap().port();
        b.send_to(&[1, 2, 3], (Ipv4Addr::LOCALHOST, a_port)).unwrap();

        // Loopback delivery is not instantaneous
        let mut received = None;
        for _ in 0..100 {
            if let Some(len) = a.try_recv(&mut buf).unwrap() {
                received = Some(len);
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        assert_eq!(received, Some(3));
        assert_eq!(&buf[..3], &[1, 2, 3]);
    }

    #[test]
    fn test_resolve_literal_address() {
        let addr = StdResolver.resolve("127.0.0.1").unwrap();
        assert_eq!(addr, IpAddr::V4(Ipv4Addr::LOCALHOST));
    }

    #[test]
    fn test_uptime_is_monotonic() {
        let uptime = Uptime::new();
        let first = uptime.now_ms();
        std::thread::sleep(std::time::Duration::from_millis(2));
        assert!(uptime.now_ms() >= first);
    }
}
