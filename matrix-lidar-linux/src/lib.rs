//! Host side of the matrix lidar stack
//!
//! Runs the same acquisition loop as the firmware on a Linux board
//! (typically a Raspberry Pi), with the sensor on `/dev/i2c-*` or a
//! serial device. Readings go to stdout; diagnostics go through `log`.

pub mod config;
pub mod delay;
pub mod error;
pub mod output;
pub mod runner;
pub mod serial;

pub use config::HostConfig;
pub use delay::StdDelay;
pub use error::AppError;
pub use output::IoSink;
pub use runner::run;
pub use serial::SerialUart;

/// Initialize `env_logger`, honoring `RUST_LOG` and defaulting to `info`
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}
