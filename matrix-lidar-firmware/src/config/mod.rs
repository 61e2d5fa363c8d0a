//! Configuration loading and parsing
//!
//! The configuration is compiled in from lidar.toml and parsed by a
//! custom no_std parser. build.rs has already checked it with the full
//! `toml` crate, so parse failures here mean a parser gap.

pub mod toml;

pub use toml::{parse_config, ParseError};
