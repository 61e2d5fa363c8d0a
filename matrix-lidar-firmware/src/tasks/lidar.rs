//! Lidar acquisition loop
//!
//! Sets the sensor up under the configured retry policy, then polls it
//! forever and prints each reading.

use defmt::*;
use embassy_time::Delay;

use matrix_lidar_core::acquisition::{Acquisition, PollError, Reading};
use matrix_lidar_core::config::AcquisitionConfig;
use matrix_lidar_core::retry::SetupEvent;
use matrix_lidar_drivers::{DriverError, MatrixLidar, Transport};

use crate::output::DefmtSink;

/// Run the acquisition loop on the given transport
pub fn run<T>(transport: T, config: AcquisitionConfig) -> !
where
    T: Transport,
    T::Error: Format,
{
    let sensor = MatrixLidar::new(transport, Delay, config.driver);
    let mut acquisition = match Acquisition::new(sensor, Delay, config) {
        Ok(acquisition) => acquisition,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            halt()
        }
    };

    info!(
        "Setting up {}x{} sensor",
        config.resolution.side(),
        config.resolution.side()
    );
    if let Err(e) = acquisition.setup(|event| log_setup_event(event)) {
        error!("Sensor setup gave up: {}", e);
        halt()
    }
    info!("Sensor ready, polling every {} ms", config.poll_interval_ms);

    let mut sink = DefmtSink::new();
    acquisition.run(&mut sink, log_poll)
}

fn log_poll<E: Format>(outcome: Result<Reading, PollError<DriverError<E>>>) {
    match outcome {
        Ok(Reading::Frame {
            nearest: Some((at, distance)),
        }) => debug!("Nearest return {} mm at ({}, {})", distance, at.row, at.col),
        Ok(_) => {}
        Err(e) => warn!("Poll failed: {}", e),
    }
}

fn log_setup_event<E: Format>(event: &SetupEvent<'_, DriverError<E>>) {
    match event {
        SetupEvent::BeginFailed { attempt, error, .. }
        | SetupEvent::ConfigureFailed { attempt, error, .. } => {
            warn!("{} (attempt {}: {})", Display2Format(event), attempt, error)
        }
        _ => info!("{}", Display2Format(event)),
    }
}

/// Park the core after an unrecoverable error
fn halt() -> ! {
    loop {
        cortex_m::asm::wfi();
    }
}
