//! Setup retry handling
//!
//! The sensor may not answer right after power-up, so setup repeats
//! `begin` and `configure` under an explicit [`RetryPolicy`].

pub mod policy;
pub mod sequencer;

pub use policy::{Backoff, BackoffKind, RetryPolicy, RetrySettings, DEFAULT_RETRY_DELAY_MS};
pub use sequencer::{Phase, SetupError, SetupEvent, SetupSequencer, Stage};
