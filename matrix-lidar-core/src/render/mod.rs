//! Text rendering of readings
//!
//! Output goes to any [`core::fmt::Write`] sink: a `String` in tests,
//! stdout on Linux, a defmt line buffer on the firmware.

pub mod text;

pub use text::{render_grid, render_point, SEPARATOR};
