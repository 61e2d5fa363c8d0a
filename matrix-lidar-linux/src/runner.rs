//! Host acquisition loop
//!
//! Opens the configured bus, sets the sensor up and polls forever,
//! printing each reading to stdout.

use std::convert::Infallible;
use std::fmt::Debug;

use linux_embedded_hal::I2cdev;
use log::{debug, info, warn};
use matrix_lidar_core::acquisition::{Acquisition, PollError, Reading};
use matrix_lidar_core::config::{AcquisitionConfig, TransportConfig};
use matrix_lidar_core::retry::SetupEvent;
use matrix_lidar_drivers::{I2cTransport, MatrixLidar, Transport, UartTransport};
use matrix_lidar_hal::EhI2c;

use crate::config::HostConfig;
use crate::delay::StdDelay;
use crate::error::AppError;
use crate::output::IoSink;
use crate::serial::SerialUart;

/// Open the configured transport and run the acquisition loop
///
/// Only returns on a configuration, device or setup error.
pub fn run(config: &HostConfig) -> Result<Infallible, AppError> {
    config.validate()?;

    match config.acquisition.transport {
        TransportConfig::I2c { address } => {
            let path = &config.devices.bus;
            let bus = I2cdev::new(path).map_err(|e| AppError::OpenBus {
                path: path.clone(),
                source: Box::new(e),
            })?;
            info!("Using I2C bus {} at address {:#04x}", path.display(), address);
            drive(I2cTransport::new(EhI2c::new(bus), address), config.acquisition)
        }
        TransportConfig::Uart { baudrate } => {
            let path = &config.devices.device;
            let uart = SerialUart::open(path, baudrate).map_err(|source| AppError::OpenSerial {
                path: path.clone(),
                source,
            })?;
            info!("Using serial device {} at {} baud", path.display(), baudrate);
            drive(
                UartTransport::new(uart, &config.acquisition.driver),
                config.acquisition,
            )
        }
    }
}

fn drive<T>(transport: T, config: AcquisitionConfig) -> Result<Infallible, AppError>
where
    T: Transport,
    T::Error: Debug,
{
    let sensor = MatrixLidar::new(transport, StdDelay, config.driver);
    let mut acquisition = Acquisition::new(sensor, StdDelay, config)?;

    let side = config.resolution.side();
    info!("Setting up {}x{} sensor", side, side);
    acquisition
        .setup(report_setup_event)
        .map_err(|e| AppError::Setup(e.to_string()))?;
    info!("Sensor ready, polling every {} ms", config.poll_interval_ms);

    let mut sink = IoSink::stdout();
    acquisition.run(&mut sink, report_poll)
}

fn report_poll<E: Debug>(outcome: Result<Reading, PollError<E>>) {
    match outcome {
        Ok(Reading::Frame {
            nearest: Some((at, distance)),
        }) => debug!("Nearest return {} mm at ({}, {})", distance, at.row, at.col),
        Ok(_) => {}
        Err(e) => warn!("Poll failed: {}", e),
    }
}

/// Failures print their diagnostic line on stdout next to the readings
fn report_setup_event<E: Debug>(event: &SetupEvent<'_, E>) {
    match event {
        SetupEvent::BeginFailed {
            attempt,
            error,
            retry_in_ms,
        }
        | SetupEvent::ConfigureFailed {
            attempt,
            error,
            retry_in_ms,
        } => {
            println!("{}", event);
            warn!(
                "Attempt {} failed: {:?} (retry in {:?} ms)",
                attempt, error, retry_in_ms
            );
        }
        _ => info!("{}", event),
    }
}
