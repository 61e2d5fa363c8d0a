//! Serial device adapter

use std::io::{self, Read, Write};
use std::path::Path;
use std::time::Duration;

use log::debug;
use matrix_lidar_hal::{UartRx, UartTx};
use serialport::SerialPort;

/// Read timeout of the OS port
///
/// Kept short: the transport does its own timeout accounting and treats
/// an empty read as "nothing yet".
pub const PORT_READ_TIMEOUT: Duration = Duration::from_millis(1);

/// A `serialport` device exposed through the HAL UART traits
pub struct SerialUart {
    port: Box<dyn SerialPort>,
}

impl SerialUart {
    /// Open `path` at 8N1 and the given baud rate
    pub fn open(path: &Path, baudrate: u32) -> Result<Self, serialport::Error> {
        let port = serialport::new(path.to_string_lossy(), baudrate)
            .timeout(PORT_READ_TIMEOUT)
            .open()?;
        debug!("Opened {} at {} baud", path.display(), baudrate);
        Ok(Self::from_port(port))
    }

    pub fn from_port(port: Box<dyn SerialPort>) -> Self {
        Self { port }
    }
}

impl UartTx for SerialUart {
    type Error = io::Error;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.port.write_all(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.port.flush()
    }
}

impl UartRx for SerialUart {
    type Error = io::Error;

    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        match self.port.read(buf) {
            Ok(n) => Ok(n),
            Err(e) if e.kind() == io::ErrorKind::TimedOut => Ok(0),
            Err(e) => Err(e),
        }
    }
}
