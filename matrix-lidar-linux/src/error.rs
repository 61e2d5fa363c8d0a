//! Host application errors

use std::io;
use std::path::PathBuf;

use matrix_lidar_core::config::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to read {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    ParseConfig {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(ConfigError),

    #[error("Failed to open I2C bus {path}: {source}")]
    OpenBus {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to open serial device {path}: {source}")]
    OpenSerial {
        path: PathBuf,
        #[source]
        source: serialport::Error,
    },

    #[error("Sensor setup failed: {0}")]
    Setup(String),
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::InvalidConfig(e)
    }
}
