//! Timekeeping and cooperative scheduling hooks

/// Millisecond uptime counter
///
/// Wraps after ~49.7 days; consumers compare with `wrapping_sub`.
pub trait MonotonicClock {
    /// Milliseconds since boot
    fn now_ms(&self) -> u32;
}

/// Pending work serviced while the controller waits
///
/// Long animations call this between short waits so the web server, mDNS
/// responder and watchdog keep running.
pub trait Housekeeping {
    /// Run one round of pending work; must return quickly
    fn service(&mut self);
}

impl<F: FnMut()> Housekeeping for F {
    fn service(&mut self) {
        self()
    }
}
