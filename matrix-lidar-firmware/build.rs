//! Build script for matrix-lidar-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates lidar.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate lidar.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=lidar.toml");

    let config_path = Path::new("lidar.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: lidar.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds a lidar.toml configuration file.            ║\n\
            ║  Please create one in the matrix-lidar-firmware directory.       ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read lidar.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in lidar.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    let resolution = validate_root(&config, &mut errors);
    validate_transport(&config, &mut errors);
    validate_fixed_point(&config, resolution, &mut errors);
    validate_retry(&config, &mut errors);
    validate_driver(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid values in lidar.toml                             ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=lidar.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn integer(table: &toml::Value, key: &str, errors: &mut Vec<String>) -> Option<i64> {
    match table.get(key) {
        None => None,
        Some(toml::Value::Integer(v)) => Some(*v),
        Some(_) => {
            errors.push(format!("'{}' must be an integer", key));
            None
        }
    }
}

fn check_range(key: &str, value: Option<i64>, min: i64, max: i64, errors: &mut Vec<String>) {
    if let Some(v) = value {
        if v < min || v > max {
            errors.push(format!("'{}' must be {}-{}", key, min, max));
        }
    }
}

fn check_choice(table: &toml::Value, key: &str, choices: &[&str], errors: &mut Vec<String>) {
    match table.get(key) {
        None => {}
        Some(toml::Value::String(s)) if choices.contains(&s.as_str()) => {}
        Some(_) => errors.push(format!("'{}' must be one of {:?}", key, choices)),
    }
}

/// Top-level keys; returns the matrix side
fn validate_root(config: &toml::Value, errors: &mut Vec<String>) -> i64 {
    let resolution = integer(config, "resolution", errors).unwrap_or(8);
    if resolution != 4 && resolution != 8 {
        errors.push("'resolution' must be 4 or 8".to_string());
    }

    check_range(
        "poll_interval_ms",
        integer(config, "poll_interval_ms", errors),
        0,
        u32::MAX as i64,
        errors,
    );
    check_choice(config, "mode", &["frame", "point"], errors);

    if let Some(width) = integer(config, "row_width", errors) {
        let cells = resolution * resolution;
        if width <= 0 || cells % width != 0 {
            errors.push(format!("'row_width' must divide the {} cells", cells));
        }
    }

    resolution
}

fn validate_transport(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(transport) = config.get("transport") else {
        return;
    };
    check_choice(transport, "kind", &["i2c", "uart"], errors);
    check_range("address", integer(transport, "address", errors), 0, 0x7F, errors);
    check_range(
        "baudrate",
        integer(transport, "baudrate", errors),
        1,
        u32::MAX as i64,
        errors,
    );
}

fn validate_fixed_point(config: &toml::Value, resolution: i64, errors: &mut Vec<String>) {
    let Some(point) = config.get("fixed_point") else {
        return;
    };
    check_range("row", integer(point, "row", errors), 0, resolution - 1, errors);
    check_range("col", integer(point, "col", errors), 0, resolution - 1, errors);
}

fn validate_retry(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(retry) = config.get("retry") else {
        return;
    };
    for key in ["max_attempts", "delay_ms", "max_delay_ms"] {
        check_range(key, integer(retry, key, errors), 0, u32::MAX as i64, errors);
    }
    check_range("factor", integer(retry, "factor", errors), 2, 1000, errors);
    check_choice(retry, "backoff", &["fixed", "exponential"], errors);
    if let Some(value) = retry.get("abort_on_permanent") {
        if !value.is_bool() {
            errors.push("'abort_on_permanent' must be true or false".to_string());
        }
    }
}

fn validate_driver(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(driver) = config.get("driver") else {
        return;
    };
    for key in ["response_timeout_ms", "poll_step_ms", "uart_read_timeout_ms"] {
        check_range(key, integer(driver, key, errors), 1, u32::MAX as i64, errors);
    }
    for key in ["noise_backoff_ms", "mode_settle_ms", "uart_byte_gap_ms"] {
        check_range(key, integer(driver, key, errors), 0, u32::MAX as i64, errors);
    }
}
