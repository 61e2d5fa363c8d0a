//! Acquisition loop
//!
//! ```text
//! UNINITIALIZED ─► BEGUN ─► READY ─► [POLL ─► DECODE/FORMAT ─► PRINT ─► SLEEP]*
//! ```

pub mod poller;

pub use poller::{Acquisition, PollError, Reading};
