//! Ranging sensor handle

use core::fmt;

use heapless::Vec;

use super::classify::Classify;

/// Largest raw frame a sensor returns (8x8 cells, 2 bytes each)
pub const MAX_FRAME_BYTES: usize = 128;

/// Raw little-endian frame bytes as returned by the sensor
pub type RawFrame = Vec<u8, MAX_FRAME_BYTES>;

/// Sensing matrix size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(try_from = "u8", into = "u8")
)]
pub enum Resolution {
    /// 4x4 cells
    X4,
    /// 8x8 cells
    #[default]
    X8,
}

impl Resolution {
    /// Cells per row and per column; also the value sent on the wire
    pub const fn side(self) -> u8 {
        match self {
            Resolution::X4 => 4,
            Resolution::X8 => 8,
        }
    }

    /// Number of cells in a frame
    pub const fn cells(self) -> usize {
        let side = self.side() as usize;
        side * side
    }

    /// Byte length of a full frame
    pub const fn frame_bytes(self) -> usize {
        self.cells() * 2
    }

    /// Check that a coordinate lies inside the grid
    pub const fn contains(self, row: u8, col: u8) -> bool {
        row < self.side() && col < self.side()
    }
}

/// A matrix size other than 4 or 8
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidResolution(pub u8);

impl fmt::Display for InvalidResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported resolution {} (expected 4 or 8)", self.0)
    }
}

impl TryFrom<u8> for Resolution {
    type Error = InvalidResolution;

    fn try_from(side: u8) -> Result<Self, Self::Error> {
        match side {
            4 => Ok(Resolution::X4),
            8 => Ok(Resolution::X8),
            other => Err(InvalidResolution(other)),
        }
    }
}

impl From<Resolution> for u8 {
    fn from(resolution: Resolution) -> u8 {
        resolution.side()
    }
}

/// Handle to a matrix ranging sensor
///
/// Implementations own the bus and hide the wire protocol. Every call is
/// blocking; a call either completes or returns an error the caller can
/// classify for retry.
pub trait RangingSensor {
    /// Error type returned by all operations
    type Error: Classify;

    /// Open the connection to the sensor
    fn begin(&mut self) -> Result<(), Self::Error>;

    /// Select the sensing matrix
    ///
    /// Only valid after a successful [`begin`](Self::begin).
    fn configure(&mut self, resolution: Resolution) -> Result<(), Self::Error>;

    /// Read one full frame of raw little-endian bytes
    fn read_frame(&mut self) -> Result<RawFrame, Self::Error>;

    /// Read the distance of a single cell
    fn read_point(&mut self, row: u8, col: u8) -> Result<u16, Self::Error>;
}
