//! Configuration validation errors

use core::fmt;

use crate::frame::CoordinateError;
use crate::traits::InvalidResolution;

/// A configuration value that cannot be used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Matrix size other than 4 or 8
    InvalidResolution(u8),
    /// Row width of zero
    ZeroRowWidth,
    /// Row width that does not divide the cell count
    RowWidthMismatch { width: u8, cells: usize },
    /// Fixed point outside the matrix
    PointOutOfRange(CoordinateError),
    /// I2C address above the 7-bit range
    InvalidAddress(u8),
    /// UART baud rate of zero
    ZeroBaudrate,
    /// A timing value that must be positive is zero
    ZeroDuration(&'static str),
    /// `max_attempts` of zero would never try at all
    ZeroAttempts,
    /// Exponential backoff factor below 2
    BackoffFactor(u32),
    /// Exponential backoff cap below the initial delay
    BackoffCap { initial_ms: u32, max_ms: u32 },
}

impl From<InvalidResolution> for ConfigError {
    fn from(e: InvalidResolution) -> Self {
        ConfigError::InvalidResolution(e.0)
    }
}

impl From<CoordinateError> for ConfigError {
    fn from(e: CoordinateError) -> Self {
        ConfigError::PointOutOfRange(e)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidResolution(side) => {
                write!(f, "{}", InvalidResolution(*side))
            }
            ConfigError::ZeroRowWidth => f.write_str("row_width must be at least 1"),
            ConfigError::RowWidthMismatch { width, cells } => write!(
                f,
                "row_width {} does not divide the {} cells of a frame",
                width, cells
            ),
            ConfigError::PointOutOfRange(e) => write!(f, "{}", e),
            ConfigError::InvalidAddress(address) => {
                write!(f, "I2C address {:#04x} is not a 7-bit address", address)
            }
            ConfigError::ZeroBaudrate => f.write_str("baudrate must be positive"),
            ConfigError::ZeroDuration(field) => write!(f, "{} must be positive", field),
            ConfigError::ZeroAttempts => f.write_str("max_attempts must be at least 1"),
            ConfigError::BackoffFactor(factor) => {
                write!(f, "backoff factor {} must be at least 2", factor)
            }
            ConfigError::BackoffCap { initial_ms, max_ms } => write!(
                f,
                "max_delay_ms {} is below the initial delay {}",
                max_ms, initial_ms
            ),
        }
    }
}
