//! Print the whole distance matrix once per poll interval
//!
//! ```bash
//! RUST_LOG=debug get_all_data
//! ```

use anyhow::{Context, Result};
use matrix_lidar_core::config::PollMode;
use matrix_lidar_linux::{init_logging, run, HostConfig};

fn main() -> Result<()> {
    init_logging();

    let path = HostConfig::default_path();
    let config = HostConfig::load(&path)?.with_mode(PollMode::FullFrame);

    match run(&config).context("Matrix lidar stopped")? {}
}
