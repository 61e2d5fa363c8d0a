//! I2C transport
//!
//! The sensor answers every single-byte read: idle bytes (0xFF) until a
//! response is queued, then the response itself.

use embedded_hal::delay::DelayNs;
use matrix_lidar_hal::I2cBus;

use super::Transport;
use crate::lidar::DriverError;

/// Largest write issued in one transaction
pub const I2C_CHUNK_SIZE: usize = 32;

/// Sensor attached to an I2C bus
pub struct I2cTransport<B> {
    bus: B,
    address: u8,
}

impl<B: I2cBus> I2cTransport<B> {
    /// Create a transport for the sensor at `address`
    pub fn new(bus: B, address: u8) -> Self {
        Self { bus, address }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Release the bus
    pub fn release(self) -> B {
        self.bus
    }

    fn read_one(&mut self) -> Result<u8, DriverError<B::Error>> {
        let mut byte = [0u8; 1];
        self.bus
            .read(self.address, &mut byte)
            .map_err(DriverError::Bus)?;
        Ok(byte[0])
    }
}

impl<B: I2cBus> Transport for I2cTransport<B> {
    type Error = B::Error;

    fn open(&mut self) -> Result<(), DriverError<B::Error>> {
        self.bus.probe(self.address).map_err(DriverError::Bus)
    }

    fn send<D: DelayNs>(
        &mut self,
        packet: &[u8],
        _delay: &mut D,
    ) -> Result<(), DriverError<B::Error>> {
        for chunk in packet.chunks(I2C_CHUNK_SIZE) {
            self.bus
                .write(self.address, chunk)
                .map_err(DriverError::Bus)?;
        }
        Ok(())
    }

    fn poll_byte(&mut self) -> Result<Option<u8>, DriverError<B::Error>> {
        self.read_one().map(Some)
    }

    fn receive<D: DelayNs>(
        &mut self,
        buf: &mut [u8],
        _delay: &mut D,
    ) -> Result<(), DriverError<B::Error>> {
        // One byte per transaction; the sensor does not support burst reads
        for slot in buf.iter_mut() {
            *slot = self.read_one()?;
        }
        Ok(())
    }
}
