//! Distance frame decoding
//!
//! The sensor reports each cell as two bytes, low byte first. Decoding is
//! a pure function of the byte slice.

pub mod decode;
pub mod grid;

pub use decode::{decode_samples, Samples};
pub use grid::{Coordinate, CoordinateError, DistanceFrame, FrameError, MAX_CELLS};
