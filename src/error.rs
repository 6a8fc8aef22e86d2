//! Error types for the sensor drivers.
//!
//! Every driver operation is a short sequence of I2C transactions, so the
//! error carries the bus error of whichever transaction failed, plus the
//! two device-level conditions the drivers detect themselves.

use core::fmt::{Debug, Formatter};
use embedded_hal::i2c::I2c;

/// Error types that can occur during sensor operations.
pub enum Error<I>
where
    I: I2c,
{
    /// Error occurred during an I2C write operation
    WriteError(I::Error),
    /// Error occurred during an I2C write-read operation
    WriteReadError(I::Error),
    /// Chip identifier register did not match the expected device
    WrongDevice(u8),
    /// Device did not flag a finished measurement in time
    NotReady,
}

impl<I> Error<I>
where
    I: I2c,
{
    /// Whether the error came from the bus rather than from the device.
    pub fn is_bus_error(&self) -> bool {
        matches!(self, Self::WriteError(_) | Self::WriteReadError(_))
    }
}

impl<I> Debug for Error<I>
where
    I: I2c,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::result::Result<(), core::fmt::Error> {
        match self {
            Self::WriteReadError(e) => f.debug_tuple("WriteReadError").field(e).finish(),
            Self::WriteError(e) => f.debug_tuple("WriteError").field(e).finish(),
            Self::WrongDevice(id) => f.debug_tuple("WrongDevice").field(id).finish(),
            Self::NotReady => f.write_str("NotReady"),
        }
    }
}
