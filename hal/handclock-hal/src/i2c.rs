//! I2C bus abstractions
//!
//! The master only ever writes to its peripherals, so the bus trait is a
//! single addressed write. Every implementation reports failures through the
//! closed [`BusError`] set, which keeps transport details out of the display
//! and logging code.

use embedded_hal::i2c::{Error as _, ErrorKind, I2c, NoAcknowledgeSource};

/// Why a bus transaction failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// Payload does not fit the transmit buffer
    PayloadTooLarge,
    /// Peripheral missing or unresponsive (NACK on address)
    AddressNack,
    /// Peripheral rejected the data (NACK on data)
    DataNack,
    /// Any other hardware fault (arbitration, overrun, bus error)
    Hardware,
    /// Bus held low past the clock-stretch limit
    Timeout,
}

impl BusError {
    /// Diagnostic message for logs
    pub const fn description(&self) -> &'static str {
        match self {
            BusError::PayloadTooLarge => "Data too long",
            BusError::AddressNack => "Board missing/unresponsive (NACK on address)",
            BusError::DataNack => "Data rejection (NACK on data)",
            BusError::Hardware => "Other hardware error",
            BusError::Timeout => "Timeout (I2C bus locked up)",
        }
    }

    /// Numeric code used by Arduino-style `endTransmission` (1-5)
    pub const fn code(&self) -> u8 {
        match self {
            BusError::PayloadTooLarge => 1,
            BusError::AddressNack => 2,
            BusError::DataNack => 3,
            BusError::Hardware => 4,
            BusError::Timeout => 5,
        }
    }
}

impl core::fmt::Display for BusError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.description())
    }
}

impl From<ErrorKind> for BusError {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data) => BusError::DataNack,
            ErrorKind::NoAcknowledge(_) => BusError::AddressNack,
            ErrorKind::Overrun => BusError::PayloadTooLarge,
            _ => BusError::Hardware,
        }
    }
}

/// I2C bus master
///
/// Implementations must bound every transaction (clock-stretch limit or
/// adapter timeout) so a wedged peripheral cannot hang the caller.
pub trait I2cBus {
    /// Write data to a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `data` - Bytes to write
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), BusError>;
}

impl<T: I2cBus + ?Sized> I2cBus for &mut T {
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), BusError> {
        (**self).write(address, data)
    }
}

/// Adapter exposing any `embedded-hal` I2C driver as an [`I2cBus`]
#[derive(Debug)]
pub struct EmbeddedHalBus<I> {
    inner: I,
}

impl<I: I2c> EmbeddedHalBus<I> {
    /// Wrap an `embedded-hal` I2C driver
    pub fn new(inner: I) -> Self {
        Self { inner }
    }

    /// Release the wrapped driver
    pub fn into_inner(self) -> I {
        self.inner
    }
}

impl<I: I2c> I2cBus for EmbeddedHalBus<I> {
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), BusError> {
        self.inner
            .write(address, data)
            .map_err(|e| BusError::from(e.kind()))
    }
}
