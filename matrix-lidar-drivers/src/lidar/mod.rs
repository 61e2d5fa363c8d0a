//! Matrix lidar driver
//!
//! Speaks the command protocol over any [`Transport`](crate::transport::Transport).

pub mod driver;
pub mod error;

pub use driver::MatrixLidar;
pub use error::DriverError;
