//! Validated distance frames

use core::fmt;

use heapless::Vec;

use super::decode::decode_samples;
use crate::traits::Resolution;

/// Maximum cells in a frame (8x8)
pub const MAX_CELLS: usize = 64;

/// Errors building a frame from raw bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Byte count does not match the resolution
    LengthMismatch { expected: usize, actual: usize },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::LengthMismatch { expected, actual } => {
                write!(f, "frame has {} bytes, expected {}", actual, expected)
            }
        }
    }
}

/// Coordinate outside the sensing matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CoordinateError {
    pub coordinate: Coordinate,
    pub resolution: Resolution,
}

impl fmt::Display for CoordinateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "point ({}, {}) is outside the {}x{} matrix",
            self.coordinate.row,
            self.coordinate.col,
            self.resolution.side(),
            self.resolution.side()
        )
    }
}

/// One cell of the matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Coordinate {
    pub row: u8,
    pub col: u8,
}

impl Coordinate {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Check the coordinate against a matrix size
    pub fn validate(self, resolution: Resolution) -> Result<Self, CoordinateError> {
        if resolution.contains(self.row, self.col) {
            Ok(self)
        } else {
            Err(CoordinateError {
                coordinate: self,
                resolution,
            })
        }
    }
}

/// A complete decoded frame, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DistanceFrame {
    resolution: Resolution,
    samples: Vec<u16, MAX_CELLS>,
}

impl DistanceFrame {
    /// Decode a frame, requiring exactly `2 * cells` bytes
    pub fn from_bytes(resolution: Resolution, bytes: &[u8]) -> Result<Self, FrameError> {
        let expected = resolution.frame_bytes();
        if bytes.len() != expected {
            return Err(FrameError::LengthMismatch {
                expected,
                actual: bytes.len(),
            });
        }

        // Length checked above, so every sample fits
        let samples = decode_samples(bytes).collect();
        Ok(Self {
            resolution,
            samples,
        })
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// All samples in row-major order
    pub fn samples(&self) -> &[u16] {
        &self.samples
    }

    /// Sample at a cell, if the cell exists
    pub fn get(&self, row: u8, col: u8) -> Option<u16> {
        if !self.resolution.contains(row, col) {
            return None;
        }
        let side = self.resolution.side() as usize;
        self.samples.get(row as usize * side + col as usize).copied()
    }

    /// Iterate over the rows of the frame
    pub fn rows(&self) -> impl Iterator<Item = &[u16]> + '_ {
        self.samples.chunks(self.resolution.side() as usize)
    }

    /// Closest return in the frame and where it is
    ///
    /// Ties resolve to the first cell in row-major order.
    pub fn nearest(&self) -> Option<(Coordinate, u16)> {
        let side = self.resolution.side() as usize;
        self.samples
            .iter()
            .enumerate()
            .min_by_key(|(_, distance)| **distance)
            .map(|(index, distance)| {
                let coordinate = Coordinate::new((index / side) as u8, (index % side) as u8);
                (coordinate, *distance)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_bytes(resolution: Resolution, f: impl Fn(usize) -> u16) -> std::vec::Vec<u8> {
        (0..resolution.cells())
            .flat_map(|i| f(i).to_le_bytes())
            .collect()
    }

    #[test]
    fn test_from_bytes_4x4() {
        let bytes = frame_bytes(Resolution::X4, |i| i as u16 * 10);
        let frame = DistanceFrame::from_bytes(Resolution::X4, &bytes).unwrap();
        assert_eq!(frame.samples().len(), 16);
        assert_eq!(frame.get(0, 0), Some(0));
        assert_eq!(frame.get(1, 2), Some(60));
        assert_eq!(frame.get(3, 3), Some(150));
        assert_eq!(frame.get(4, 0), None);
    }

    #[test]
    fn test_from_bytes_length_mismatch() {
        let result = DistanceFrame::from_bytes(Resolution::X8, &[0u8; 32]);
        assert_eq!(
            result,
            Err(FrameError::LengthMismatch {
                expected: 128,
                actual: 32
            })
        );
    }

    #[test]
    fn test_rows() {
        let bytes = frame_bytes(Resolution::X8, |i| i as u16);
        let frame = DistanceFrame::from_bytes(Resolution::X8, &bytes).unwrap();
        let rows: std::vec::Vec<&[u16]> = frame.rows().collect();
        assert_eq!(rows.len(), 8);
        assert_eq!(rows[2][0], 16);
        assert!(rows.iter().all(|row| row.len() == 8));
    }

    #[test]
    fn test_nearest_first_minimum() {
        let bytes = frame_bytes(Resolution::X4, |i| if i == 6 || i == 9 { 12 } else { 900 });
        let frame = DistanceFrame::from_bytes(Resolution::X4, &bytes).unwrap();
        assert_eq!(frame.nearest(), Some((Coordinate::new(1, 2), 12)));
    }

    #[test]
    fn test_coordinate_validate() {
        assert!(Coordinate::new(1, 0).validate(Resolution::X4).is_ok());
        let err = Coordinate::new(4, 0).validate(Resolution::X4).unwrap_err();
        assert_eq!(err.resolution, Resolution::X4);
        assert!(Coordinate::new(7, 7).validate(Resolution::X8).is_ok());
    }
}
