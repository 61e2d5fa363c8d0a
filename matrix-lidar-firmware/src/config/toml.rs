//! Simple TOML parser for lidar configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! lidar.toml. It does NOT support the full TOML spec.
//!
//! Supported features:
//! - Key = value pairs (string, integer, boolean)
//! - Decimal and `0x` hexadecimal integers
//! - [section] headers
//! - Comments (# ...)

use matrix_lidar_core::config::{
    AcquisitionConfig, GridLayout, PollMode, TransportKind, TransportSettings,
};
use matrix_lidar_core::retry::{BackoffKind, RetrySettings};
use matrix_lidar_core::traits::Resolution;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Invalid value type or range
    InvalidValue,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Transport,
    FixedPoint,
    Retry,
    Driver,
    /// Section this firmware has no use for; its keys are skipped
    Other,
}

/// Parse TOML configuration into AcquisitionConfig
///
/// Keys and sections this firmware does not use (host device paths) are
/// skipped.
pub fn parse_config(input: &str) -> Result<AcquisitionConfig, ParseError> {
    let mut config = AcquisitionConfig::default();
    let mut transport = TransportSettings::default();
    let mut retry = RetrySettings::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1]);
            continue;
        }

        let Some((key, value)) = parse_key_value(line) else {
            continue;
        };

        match section {
            Section::Root => apply_root(&mut config, key, value)?,
            Section::Transport => match key {
                "kind" => {
                    transport.kind = match parse_string(value) {
                        "i2c" => TransportKind::I2c,
                        "uart" => TransportKind::Uart,
                        _ => return Err(ParseError::InvalidValue),
                    }
                }
                "address" => transport.address = Some(parse_int(value)?),
                "baudrate" => transport.baudrate = Some(parse_int(value)?),
                _ => {} // Ignore unknown keys
            },
            Section::FixedPoint => match key {
                "row" => config.fixed_point.row = parse_int(value)?,
                "col" => config.fixed_point.col = parse_int(value)?,
                _ => {}
            },
            Section::Retry => apply_retry(&mut retry, key, value)?,
            Section::Other => {}
            Section::Driver => {
                let driver = &mut config.driver;
                match key {
                    "response_timeout_ms" => driver.response_timeout_ms = parse_int(value)?,
                    "poll_step_ms" => driver.poll_step_ms = parse_int(value)?,
                    "noise_backoff_ms" => driver.noise_backoff_ms = parse_int(value)?,
                    "mode_settle_ms" => driver.mode_settle_ms = parse_int(value)?,
                    "uart_byte_gap_ms" => driver.uart_byte_gap_ms = parse_int(value)?,
                    "uart_read_timeout_ms" => driver.uart_read_timeout_ms = parse_int(value)?,
                    _ => {}
                }
            }
        }
    }

    config.transport = transport.into();
    config.retry = retry.into();
    Ok(config)
}

fn apply_root(config: &mut AcquisitionConfig, key: &str, value: &str) -> Result<(), ParseError> {
    match key {
        "resolution" => {
            config.resolution =
                Resolution::try_from(parse_int::<u8>(value)?).map_err(|_| ParseError::InvalidValue)?
        }
        "poll_interval_ms" => config.poll_interval_ms = parse_int(value)?,
        "row_width" => config.layout = GridLayout::with_row_width(parse_int(value)?),
        "mode" => {
            config.mode = match parse_string(value) {
                "frame" => PollMode::FullFrame,
                "point" => PollMode::FixedPoint,
                _ => return Err(ParseError::InvalidValue),
            }
        }
        _ => {}
    }
    Ok(())
}

fn apply_retry(retry: &mut RetrySettings, key: &str, value: &str) -> Result<(), ParseError> {
    match key {
        "max_attempts" => retry.max_attempts = parse_int(value)?,
        "delay_ms" => retry.delay_ms = parse_int(value)?,
        "factor" => retry.factor = parse_int(value)?,
        "max_delay_ms" => retry.max_delay_ms = parse_int(value)?,
        "abort_on_permanent" => retry.abort_on_permanent = parse_bool(value)?,
        "backoff" => {
            retry.backoff = match parse_string(value) {
                "fixed" => BackoffKind::Fixed,
                "exponential" => BackoffKind::Exponential,
                _ => return Err(ParseError::InvalidValue),
            }
        }
        _ => {}
    }
    Ok(())
}

fn parse_section_header(header: &str) -> Section {
    match header.trim() {
        "transport" => Section::Transport,
        "fixed_point" => Section::FixedPoint,
        "retry" => Section::Retry,
        "driver" => Section::Driver,
        _ => Section::Other,
    }
}

/// Parse a key = value line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Remove inline comments
    let value = if let Some(hash_pos) = value.find('#') {
        // Make sure # is not inside a string
        let quote_count = value[..hash_pos].matches('"').count();
        if quote_count % 2 == 0 {
            value[..hash_pos].trim()
        } else {
            value
        }
    } else {
        value
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        &value[1..value.len() - 1]
    } else {
        // Allow unquoted strings for simple values
        value
    }
}

/// Parse a decimal or `0x` hexadecimal integer
fn parse_int<T: TryFrom<u64>>(value: &str) -> Result<T, ParseError> {
    let parsed = match value.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => value.parse(),
    };
    let parsed = parsed.map_err(|_| ParseError::InvalidValue)?;
    T::try_from(parsed).map_err(|_| ParseError::InvalidValue)
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}
