//! Sensor handle traits
//!
//! These traits define the interface between the acquisition logic
//! and the sensor driver that talks to the hardware.

pub mod classify;
pub mod sensor;

pub use classify::{Classify, FailureKind};
pub use sensor::{InvalidResolution, RangingSensor, RawFrame, Resolution, MAX_FRAME_BYTES};
