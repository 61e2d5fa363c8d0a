//! Configuration types
//!
//! Board-agnostic configuration structures. Firmware fills them from an
//! embedded TOML file, host tools deserialize them with the `serde`
//! feature; both run [`AcquisitionConfig::validate`] before use.

pub mod error;
pub mod hardware;
pub mod types;

pub use error::ConfigError;
pub use hardware::*;
pub use types::*;
