//! Hardware configuration types
//!
//! Bus selection and the timing constants of the sensor driver.

use super::error::ConfigError;

/// Factory I2C address of the sensor
pub const DEFAULT_I2C_ADDRESS: u8 = 0x33;

/// Factory UART baud rate of the sensor
pub const DEFAULT_BAUDRATE: u32 = 115_200;

/// Bus the sensor is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(from = "TransportSettings")
)]
pub enum TransportConfig {
    I2c { address: u8 },
    Uart { baudrate: u32 },
}

/// Bus selector of the `[transport]` table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum TransportKind {
    #[default]
    I2c,
    Uart,
}

/// The `[transport]` table as written
///
/// Every key is optional. Keys belonging to the other bus are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct TransportSettings {
    pub kind: TransportKind,
    pub address: Option<u8>,
    pub baudrate: Option<u32>,
}

impl From<TransportSettings> for TransportConfig {
    fn from(settings: TransportSettings) -> Self {
        match settings.kind {
            TransportKind::I2c => TransportConfig::I2c {
                address: settings.address.unwrap_or(DEFAULT_I2C_ADDRESS),
            },
            TransportKind::Uart => TransportConfig::Uart {
                baudrate: settings.baudrate.unwrap_or(DEFAULT_BAUDRATE),
            },
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig::I2c {
            address: DEFAULT_I2C_ADDRESS,
        }
    }
}

impl TransportConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            TransportConfig::I2c { address } if address > 0x7F => {
                Err(ConfigError::InvalidAddress(address))
            }
            TransportConfig::Uart { baudrate: 0 } => Err(ConfigError::ZeroBaudrate),
            _ => Ok(()),
        }
    }
}

/// Driver timing
///
/// All values are in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct DriverConfig {
    /// Give up waiting for a response after this long
    pub response_timeout_ms: u32,
    /// Wait between polls for a status byte
    pub poll_step_ms: u32,
    /// Extra wait after a noise byte
    pub noise_backoff_ms: u32,
    /// Wait after a successful mode change while the sensor restarts
    pub mode_settle_ms: u32,
    /// Gap between bytes written over UART
    pub uart_byte_gap_ms: u32,
    /// Read timeout for a UART receive
    pub uart_read_timeout_ms: u32,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            response_timeout_ms: 8000,
            poll_step_ms: 17,
            noise_backoff_ms: 10,
            mode_settle_ms: 5000,
            uart_byte_gap_ms: 1,
            uart_read_timeout_ms: 500,
        }
    }
}

impl DriverConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.response_timeout_ms == 0 {
            return Err(ConfigError::ZeroDuration("response_timeout_ms"));
        }
        if self.poll_step_ms == 0 {
            return Err(ConfigError::ZeroDuration("poll_step_ms"));
        }
        if self.uart_read_timeout_ms == 0 {
            return Err(ConfigError::ZeroDuration("uart_read_timeout_ms"));
        }
        Ok(())
    }
}
