//! Print the distance of one cell once per poll interval
//!
//! The cell comes from `[fixed_point]` in `lidar.toml` (row 1, col 0 by
//! default).

use anyhow::{Context, Result};
use matrix_lidar_core::config::PollMode;
use matrix_lidar_linux::{init_logging, run, HostConfig};

fn main() -> Result<()> {
    init_logging();

    let path = HostConfig::default_path();
    let config = HostConfig::load(&path)?.with_mode(PollMode::FixedPoint);
    log::info!(
        "Reading cell ({}, {})",
        config.acquisition.fixed_point.row,
        config.acquisition.fixed_point.col
    );

    match run(&config).context("Matrix lidar stopped")? {}
}
