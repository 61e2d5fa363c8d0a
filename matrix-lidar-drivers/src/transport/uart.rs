//! UART transport

use embedded_hal::delay::DelayNs;
use matrix_lidar_core::config::DriverConfig;
use matrix_lidar_hal::Uart;

use super::Transport;
use crate::lidar::DriverError;

/// Sensor attached to a UART
///
/// Bytes are written one at a time with a short gap, which the sensor's
/// receiver needs at 115200 baud.
pub struct UartTransport<U> {
    uart: U,
    byte_gap_ms: u32,
    read_timeout_ms: u32,
}

impl<U: Uart> UartTransport<U> {
    pub fn new(uart: U, config: &DriverConfig) -> Self {
        Self {
            uart,
            byte_gap_ms: config.uart_byte_gap_ms,
            read_timeout_ms: config.uart_read_timeout_ms,
        }
    }

    /// Release the UART
    pub fn release(self) -> U {
        self.uart
    }
}

impl<U: Uart> Transport for UartTransport<U> {
    type Error = <U as matrix_lidar_hal::UartTx>::Error;

    fn open(&mut self) -> Result<(), DriverError<Self::Error>> {
        // Nothing to check on a point-to-point link
        Ok(())
    }

    fn send<D: DelayNs>(
        &mut self,
        packet: &[u8],
        delay: &mut D,
    ) -> Result<(), DriverError<Self::Error>> {
        for byte in packet {
            self.uart
                .write_blocking(core::slice::from_ref(byte))
                .map_err(DriverError::Bus)?;
            delay.delay_ms(self.byte_gap_ms);
        }
        self.uart.flush().map_err(DriverError::Bus)
    }

    fn poll_byte(&mut self) -> Result<Option<u8>, DriverError<Self::Error>> {
        self.uart.read_byte().map_err(DriverError::Bus)
    }

    fn receive<D: DelayNs>(
        &mut self,
        buf: &mut [u8],
        delay: &mut D,
    ) -> Result<(), DriverError<Self::Error>> {
        let mut filled = 0;
        let mut waited_ms = 0;

        while filled < buf.len() {
            let n = self
                .uart
                .read_blocking(&mut buf[filled..])
                .map_err(DriverError::Bus)?;
            if n == 0 {
                if waited_ms >= self.read_timeout_ms {
                    return Err(DriverError::Timeout);
                }
                delay.delay_ms(1);
                waited_ms += 1;
            }
            filled += n;
        }
        Ok(())
    }
}
