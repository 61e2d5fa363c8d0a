//! Firmware tasks
//!
//! The acquisition loop is blocking and runs inside the main task.

pub mod lidar;
