//! Sensor driver implementations
//!
//! This crate provides the concrete implementation of the
//! [`RangingSensor`](matrix_lidar_core::traits::RangingSensor) trait
//! defined in matrix-lidar-core:
//!
//! - Transports carrying the wire protocol (I2C, UART)
//! - The matrix lidar driver speaking the command protocol

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod lidar;
pub mod transport;

pub use lidar::{DriverError, MatrixLidar};
pub use transport::{I2cTransport, Transport, UartTransport};

#[cfg(test)]
mod mock;
