//! Byte transports carrying the command protocol
//!
//! The sensor speaks the same packets over I2C and UART; only the way
//! bytes are moved differs.

pub mod i2c;
pub mod uart;

pub use i2c::{I2cTransport, I2C_CHUNK_SIZE};
pub use uart::UartTransport;

use embedded_hal::delay::DelayNs;

use crate::lidar::DriverError;

/// Byte channel to the sensor
pub trait Transport {
    /// Error type of the underlying bus
    type Error;

    /// Check that the sensor is reachable
    fn open(&mut self) -> Result<(), DriverError<Self::Error>>;

    /// Send a complete command packet
    fn send<D: DelayNs>(
        &mut self,
        packet: &[u8],
        delay: &mut D,
    ) -> Result<(), DriverError<Self::Error>>;

    /// Fetch the next byte the sensor has to offer, if any
    fn poll_byte(&mut self) -> Result<Option<u8>, DriverError<Self::Error>>;

    /// Fill `buf` completely
    fn receive<D: DelayNs>(
        &mut self,
        buf: &mut [u8],
        delay: &mut D,
    ) -> Result<(), DriverError<Self::Error>>;
}
