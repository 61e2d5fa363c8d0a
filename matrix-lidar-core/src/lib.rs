//! Transport-agnostic acquisition logic for matrix ToF sensors
//!
//! This crate contains everything between the sensor handle and the
//! output sink that does not depend on a particular bus or board:
//!
//! - The sensor handle trait and failure classification
//! - Frame decoding (little-endian 16-bit samples)
//! - Grid and fixed-point text rendering
//! - Retry policy and the setup sequencer
//! - The acquisition loop
//! - Configuration type definitions
//!
//! ```text
//! ┌──────────────┐   begin / configure    ┌────────────────┐
//! │ Acquisition  │ ─────────────────────► │ RangingSensor  │
//! │              │ ◄───────────────────── │ (driver)       │
//! └──────┬───────┘   raw frame / point    └────────────────┘
//!        │ decode + render
//!        ▼
//!   fmt::Write sink
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod acquisition;
pub mod config;
pub mod frame;
pub mod render;
pub mod retry;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;
