//! Failure classification for retry decisions

/// How a failure should be treated by the retry logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FailureKind {
    /// May clear on the next attempt (bus glitch, timeout, busy sensor)
    Transient,
    /// Repeating the same request cannot succeed
    Permanent,
}

/// Errors that know whether retrying them is worthwhile
pub trait Classify {
    /// Classify this failure
    fn classify(&self) -> FailureKind;

    /// Returns true if this failure is permanent
    fn is_permanent(&self) -> bool {
        self.classify() == FailureKind::Permanent
    }
}

impl Classify for core::convert::Infallible {
    fn classify(&self) -> FailureKind {
        match *self {}
    }
}
