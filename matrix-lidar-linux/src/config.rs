//! Host configuration loading
//!
//! The host reads the same `lidar.toml` keys as the firmware, plus the
//! device paths under `[transport]`:
//!
//! ```toml
//! [transport]
//! kind = "uart"
//! device = "/dev/ttyAMA0"
//! baudrate = 115200
//! ```

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use matrix_lidar_core::config::{AcquisitionConfig, PollMode};
use serde::Deserialize;

use crate::error::AppError;

/// Environment variable overriding the config path
pub const CONFIG_ENV: &str = "MATRIX_LIDAR_CONFIG";

/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_PATH: &str = "lidar.toml";

/// I2C bus of the Raspberry Pi header
pub const DEFAULT_I2C_BUS: &str = "/dev/i2c-1";

/// Primary UART of the Raspberry Pi header
pub const DEFAULT_SERIAL_DEVICE: &str = "/dev/ttyAMA0";

/// Linux device nodes for each transport
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DevicePaths {
    /// I2C character device
    pub bus: PathBuf,
    /// Serial device
    pub device: PathBuf,
}

impl Default for DevicePaths {
    fn default() -> Self {
        Self {
            bus: PathBuf::from(DEFAULT_I2C_BUS),
            device: PathBuf::from(DEFAULT_SERIAL_DEVICE),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HostKeys {
    transport: DevicePaths,
}

/// Everything a host binary needs to run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HostConfig {
    pub acquisition: AcquisitionConfig,
    pub devices: DevicePaths,
}

impl HostConfig {
    /// Parse a config file's contents
    ///
    /// Missing keys take their defaults. Values are not validated here.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        let acquisition: AcquisitionConfig = toml::from_str(text)?;
        let host: HostKeys = toml::from_str(text)?;
        Ok(Self {
            acquisition,
            devices: host.transport,
        })
    }

    /// Load from `path`, falling back to defaults if the file does not exist
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("{} not found, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(AppError::ReadConfig {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        debug!("Loaded configuration from {}", path.display());
        Self::parse(&text).map_err(|source| AppError::ParseConfig {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Path named by `MATRIX_LIDAR_CONFIG`, else `lidar.toml`
    pub fn default_path() -> PathBuf {
        env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Force the poll mode, as each binary reads one kind of data
    pub fn with_mode(mut self, mode: PollMode) -> Self {
        self.acquisition.mode = mode;
        self
    }

    pub fn validate(&self) -> Result<(), AppError> {
        self.acquisition.validate()?;
        Ok(())
    }
}
