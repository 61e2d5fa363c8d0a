//! Matrix Lidar - acquisition firmware
//!
//! Firmware binary for RP2040 boards with a DFRobot-style matrix ToF
//! sensor on I2C0 (GP4 SDA, GP5 SCL) or UART0 (GP0 TX, GP1 RX).
//! Readings are printed over defmt.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{self, BufferedInterruptHandler, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use matrix_lidar_core::config::{AcquisitionConfig, TransportConfig};
use matrix_lidar_drivers::{I2cTransport, UartTransport};
use matrix_lidar_hal::{EhI2c, I2cConfig, IoUart};

use crate::config::parse_config;

/// Embedded configuration (compiled into firmware)
/// Edit lidar.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../lidar.toml");

mod config;
mod output;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Matrix lidar firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();

    match config.transport {
        TransportConfig::I2c { address } => {
            let mut i2c_config = i2c::Config::default();
            i2c_config.frequency = I2cConfig::STANDARD.frequency;
            let bus = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c_config);
            info!("I2C transport, sensor at {=u8:#x}", address);

            tasks::lidar::run(I2cTransport::new(EhI2c::new(bus), address), config)
        }
        TransportConfig::Uart { baudrate } => {
            let mut uart_config = uart::Config::default();
            uart_config.baudrate = baudrate;

            let tx_buf = TX_BUF.init([0u8; 64]);
            let rx_buf = RX_BUF.init([0u8; 256]);

            let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
            let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
            info!("UART transport at {} baud", baudrate);

            let transport = UartTransport::new(IoUart::new(uart), &config.driver);
            tasks::lidar::run(transport, config)
        }
    }
}

/// Parse the embedded configuration, falling back to defaults
fn load_config() -> AcquisitionConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Configuration loaded");
            config
        }
        Err(e) => {
            warn!("Failed to parse lidar.toml ({}), using defaults", e);
            AcquisitionConfig::default()
        }
    }
}
