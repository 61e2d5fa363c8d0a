//! UART serial communication abstractions
//!
//! Provides blocking serial traits that can be implemented by
//! chip-specific HALs or host serial-port crates.

/// UART transmitter
pub trait UartTx {
    /// Error type for transmit operations
    type Error;

    /// Write data to the UART
    ///
    /// Blocks until all data has been written or an error occurs.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// UART receiver
pub trait UartRx {
    /// Error type for receive operations
    type Error;

    /// Read data from the UART
    ///
    /// Returns the number of bytes placed in `buf`. Zero means the port
    /// had nothing to deliver before its own read timeout; callers decide
    /// how long to keep trying.
    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Read a single byte from the UART
    ///
    /// Returns `None` if no byte arrived.
    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        let mut buf = [0u8; 1];
        let n = self.read_blocking(&mut buf)?;
        Ok((n == 1).then_some(buf[0]))
    }
}

/// Combined UART interface
///
/// For UARTs that provide both TX and RX on a single peripheral with one
/// error type.
pub trait Uart: UartTx + UartRx<Error = <Self as UartTx>::Error> {}

// Blanket implementation
impl<T> Uart for T where T: UartTx + UartRx<Error = <T as UartTx>::Error> {}

/// Adapter exposing an `embedded-io` serial port as a [`Uart`]
///
/// `embassy-rp`'s buffered UART implements the blocking `embedded-io`
/// traits, including `ReadReady`, so the firmware wraps it in this type.
pub struct IoUart<T> {
    inner: T,
}

impl<T> IoUart<T> {
    /// Wrap an `embedded-io` port
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Release the wrapped port
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: embedded_io::Write> UartTx for IoUart<T> {
    type Error = T::Error;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.inner.write_all(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.inner.flush()
    }
}

impl<T: embedded_io::Read + embedded_io::ReadReady> UartRx for IoUart<T> {
    type Error = T::Error;

    /// Read whatever is already buffered
    ///
    /// `embedded_io::Read::read` blocks until at least one byte arrives,
    /// so an empty port is reported as 0 bytes without calling it.
    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() || !self.inner.read_ready()? {
            return Ok(0);
        }
        self.inner.read(buf)
    }
}
