//! Acquisition configuration

use super::error::ConfigError;
use super::hardware::{DriverConfig, TransportConfig};
use crate::frame::Coordinate;
use crate::retry::RetryPolicy;
use crate::traits::Resolution;

/// Cell polled when the fixed-point mode is not told otherwise
pub const DEFAULT_FIXED_POINT: Coordinate = Coordinate::new(1, 0);

/// Wait between two polls
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 1000;

/// What each iteration of the loop reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub enum PollMode {
    /// Read and print the whole matrix
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "frame"))]
    FullFrame,
    /// Read and print one cell
    #[cfg_attr(feature = "serde", serde(rename = "point"))]
    FixedPoint,
}

/// How samples are broken into lines when rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(transparent))]
pub struct GridLayout {
    /// Samples per printed line; the matrix side when unset
    pub row_width: Option<u8>,
}

impl GridLayout {
    pub const fn with_row_width(row_width: u8) -> Self {
        Self {
            row_width: Some(row_width),
        }
    }

    /// Samples per line for a matrix size
    pub fn width(&self, resolution: Resolution) -> usize {
        self.row_width.unwrap_or(resolution.side()) as usize
    }

    pub fn validate(&self, resolution: Resolution) -> Result<(), ConfigError> {
        match self.row_width {
            None => Ok(()),
            Some(0) => Err(ConfigError::ZeroRowWidth),
            Some(width) if resolution.cells() % width as usize != 0 => {
                Err(ConfigError::RowWidthMismatch {
                    width,
                    cells: resolution.cells(),
                })
            }
            Some(_) => Ok(()),
        }
    }
}

/// Complete configuration of the acquisition loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct AcquisitionConfig {
    /// Bus the sensor is attached to
    pub transport: TransportConfig,
    /// Sensing matrix size
    pub resolution: Resolution,
    /// Line layout of rendered frames
    #[cfg_attr(feature = "serde", serde(rename = "row_width"))]
    pub layout: GridLayout,
    /// Full frame or fixed point
    pub mode: PollMode,
    /// Cell read in fixed-point mode
    pub fixed_point: Coordinate,
    /// Wait between polls (ms)
    pub poll_interval_ms: u32,
    /// Setup retry behavior
    pub retry: RetryPolicy,
    /// Driver timing
    pub driver: DriverConfig,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            transport: TransportConfig::default(),
            resolution: Resolution::default(),
            layout: GridLayout::default(),
            mode: PollMode::default(),
            fixed_point: DEFAULT_FIXED_POINT,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            retry: RetryPolicy::default(),
            driver: DriverConfig::default(),
        }
    }
}

impl AcquisitionConfig {
    /// Check every field against the others
    ///
    /// The fixed point is only checked in fixed-point mode.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.transport.validate()?;
        self.layout.validate(self.resolution)?;
        if self.mode == PollMode::FixedPoint {
            self.fixed_point.validate(self.resolution)?;
        }
        self.retry.validate()?;
        self.driver.validate()
    }

    /// Samples per rendered line
    pub fn row_width(&self) -> usize {
        self.layout.width(self.resolution)
    }
}
