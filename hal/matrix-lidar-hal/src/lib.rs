//! Matrix Lidar Hardware Abstraction Layer
//!
//! This crate defines the bus traits the sensor driver talks through.
//! Chip HALs and operating-system device crates plug in either by
//! implementing the traits directly or through the adapters for
//! `embedded-hal` I2C and `embedded-io` serial ports.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (firmware, linux demos)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  matrix-lidar-drivers (MatrixLidar)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  matrix-lidar-hal (this crate - traits) │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  embassy-rp   │       │ linux-embedded│
//! │  (RP2040)     │       │ -hal / serial │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`i2c::I2cBus`] - I2C bus operations
//! - [`uart::UartTx`], [`uart::UartRx`] - Serial communication

#![no_std]
#![deny(unsafe_code)]

pub mod i2c;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use i2c::{EhI2c, I2cBus, I2cConfig};
pub use uart::{IoUart, Uart, UartRx, UartTx};
