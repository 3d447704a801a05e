//! Encoding and decoding errors

/// Errors that can occur while encoding or decoding wire data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WireError {
    /// Output buffer too small for encoding
    BufferTooSmall,
    /// Input shorter than the fixed message size
    Truncated,
    /// Unknown hand mode byte
    InvalidMode(u8),
    /// Marker field is zero (reserved for uninitialised peripherals)
    ZeroMarker,
    /// Hands of one pair carry different markers
    MarkerMismatch,
}
