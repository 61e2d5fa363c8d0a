//! Setup sequencer
//!
//! Drives a sensor from power-up to ready:
//!
//! ```text
//! Uninitialized ──begin ok──► Begun ──configure ok──► Ready
//!       ▲  │                    ▲  │
//!       └──┘ begin failed       └──┘ configure failed
//!            (wait, retry)           (wait, retry)
//! ```
//!
//! `configure` is never issued before `begin` has succeeded.

use core::fmt;

use embedded_hal::delay::DelayNs;

use super::policy::RetryPolicy;
use crate::traits::{Classify, RangingSensor, Resolution};

/// Setup progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Nothing has succeeded yet
    #[default]
    Uninitialized,
    /// Connection open, matrix not selected
    Begun,
    /// Matrix selected, ready to poll
    Ready,
}

impl Phase {
    /// Phase reached when the current stage succeeds
    pub fn advance(self) -> Self {
        match self {
            Phase::Uninitialized => Phase::Begun,
            Phase::Begun | Phase::Ready => Phase::Ready,
        }
    }

    /// Stage still to complete, if any
    pub fn pending_stage(self) -> Option<Stage> {
        match self {
            Phase::Uninitialized => Some(Stage::Begin),
            Phase::Begun => Some(Stage::Configure),
            Phase::Ready => None,
        }
    }
}

/// Setup operation being attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Stage {
    Begin,
    Configure,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Begin => f.write_str("begin"),
            Stage::Configure => f.write_str("configure"),
        }
    }
}

/// Progress report emitted by [`SetupSequencer::run`]
#[derive(Debug)]
pub enum SetupEvent<'a, E> {
    /// `begin` failed; `retry_in_ms` is `None` when setup gives up
    BeginFailed {
        attempt: u32,
        error: &'a E,
        retry_in_ms: Option<u32>,
    },
    /// `begin` succeeded
    Begun { attempts: u32 },
    /// `configure` failed; `retry_in_ms` is `None` when setup gives up
    ConfigureFailed {
        attempt: u32,
        error: &'a E,
        retry_in_ms: Option<u32>,
    },
    /// `configure` succeeded
    Ready { attempts: u32 },
}

impl<E> SetupEvent<'_, E> {
    /// Returns true for the failure events
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            SetupEvent::BeginFailed { .. } | SetupEvent::ConfigureFailed { .. }
        )
    }
}

impl<E> fmt::Display for SetupEvent<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupEvent::BeginFailed { .. } => f.write_str("begin error!!!!"),
            SetupEvent::Begun { attempts } => write!(f, "begin ok after {} attempt(s)", attempts),
            SetupEvent::ConfigureFailed { .. } => f.write_str("init error"),
            SetupEvent::Ready { attempts } => write!(f, "init ok after {} attempt(s)", attempts),
        }
    }
}

/// Why setup stopped before reaching [`Phase::Ready`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SetupError<E> {
    /// The policy ran out of attempts
    Exhausted { stage: Stage, attempts: u32, last: E },
    /// The sensor reported a failure that retrying cannot fix
    Permanent { stage: Stage, attempt: u32, error: E },
}

impl<E> SetupError<E> {
    pub fn stage(&self) -> Stage {
        match self {
            SetupError::Exhausted { stage, .. } | SetupError::Permanent { stage, .. } => *stage,
        }
    }

    /// The last sensor error seen
    pub fn error(&self) -> &E {
        match self {
            SetupError::Exhausted { last, .. } => last,
            SetupError::Permanent { error, .. } => error,
        }
    }
}

impl<E: fmt::Debug> fmt::Display for SetupError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::Exhausted {
                stage,
                attempts,
                last,
            } => write!(f, "{} failed {} times, last error: {:?}", stage, attempts, last),
            SetupError::Permanent {
                stage,
                attempt,
                error,
            } => write!(
                f,
                "{} failed permanently on attempt {}: {:?}",
                stage, attempt, error
            ),
        }
    }
}

/// Sequences `begin` and `configure` under a retry policy
#[derive(Debug, Clone)]
pub struct SetupSequencer {
    policy: RetryPolicy,
    resolution: Resolution,
    phase: Phase,
    /// Attempts made at the pending stage
    attempts: u32,
}

impl SetupSequencer {
    pub fn new(resolution: Resolution, policy: RetryPolicy) -> Self {
        Self {
            policy,
            resolution,
            phase: Phase::Uninitialized,
            attempts: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_ready(&self) -> bool {
        self.phase == Phase::Ready
    }

    /// Start over from [`Phase::Uninitialized`]
    pub fn reset(&mut self) {
        self.phase = Phase::Uninitialized;
        self.attempts = 0;
    }

    /// Run setup until the sensor is ready or the policy gives up
    ///
    /// Every success and failure is reported to `on_event` before the
    /// sequencer sleeps or returns.
    pub fn run<S, D, F>(
        &mut self,
        sensor: &mut S,
        delay: &mut D,
        mut on_event: F,
    ) -> Result<(), SetupError<S::Error>>
    where
        S: RangingSensor,
        D: DelayNs,
        F: FnMut(&SetupEvent<'_, S::Error>),
    {
        while let Some(stage) = self.phase.pending_stage() {
            self.attempts = self.attempts.saturating_add(1);
            let attempt = self.attempts;

            let result = match stage {
                Stage::Begin => sensor.begin(),
                Stage::Configure => sensor.configure(self.resolution),
            };

            let error = match result {
                Ok(()) => {
                    self.phase = self.phase.advance();
                    self.attempts = 0;
                    on_event(&match stage {
                        Stage::Begin => SetupEvent::Begun { attempts: attempt },
                        Stage::Configure => SetupEvent::Ready { attempts: attempt },
                    });
                    continue;
                }
                Err(error) => error,
            };

            let permanent = self.policy.abort_on_permanent && error.is_permanent();
            let retry_in_ms = (!permanent && self.policy.allows_retry(attempt))
                .then(|| self.policy.backoff.delay_ms(attempt));

            on_event(&match stage {
                Stage::Begin => SetupEvent::BeginFailed {
                    attempt,
                    error: &error,
                    retry_in_ms,
                },
                Stage::Configure => SetupEvent::ConfigureFailed {
                    attempt,
                    error: &error,
                    retry_in_ms,
                },
            });

            match retry_in_ms {
                Some(delay_ms) => delay.delay_ms(delay_ms),
                None if permanent => {
                    return Err(SetupError::Permanent {
                        stage,
                        attempt,
                        error,
                    })
                }
                None => {
                    return Err(SetupError::Exhausted {
                        stage,
                        attempts: attempt,
                        last: error,
                    })
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::Backoff;
    use crate::testing::{Call, RecordingDelay, StubError, StubSensor};

    #[test]
    fn test_begin_retried_until_success() {
        let mut sensor = StubSensor::new().fail_begin(3);
        let mut delay = RecordingDelay::default();
        let mut sequencer = SetupSequencer::new(Resolution::X8, RetryPolicy::default());

        sequencer.run(&mut sensor, &mut delay, |_| {}).unwrap();

        assert!(sequencer.is_ready());
        assert_eq!(
            sensor.calls,
            [
                Call::Begin,
                Call::Begin,
                Call::Begin,
                Call::Begin,
                Call::Configure(Resolution::X8),
            ]
        );
        assert_eq!(delay.delays_ms, [1000, 1000, 1000]);
    }

    #[test]
    fn test_configure_retried_after_begin() {
        let mut sensor = StubSensor::new().fail_configure(2);
        let mut delay = RecordingDelay::default();
        let mut sequencer = SetupSequencer::new(Resolution::X4, RetryPolicy::default());

        sequencer.run(&mut sensor, &mut delay, |_| {}).unwrap();

        assert_eq!(sensor.begin_calls(), 1);
        assert_eq!(sensor.configure_calls(), 3);
        assert_eq!(sensor.calls[0], Call::Begin);
    }

    #[test]
    fn test_failure_messages() {
        let mut sensor = StubSensor::new().fail_begin(2).fail_configure(1);
        let mut delay = RecordingDelay::default();
        let mut sequencer = SetupSequencer::new(Resolution::X8, RetryPolicy::default());
        let mut lines: Vec<String> = Vec::new();

        sequencer
            .run(&mut sensor, &mut delay, |event| {
                if event.is_failure() {
                    lines.push(event.to_string());
                }
            })
            .unwrap();

        assert_eq!(lines, ["begin error!!!!", "begin error!!!!", "init error"]);
    }

    #[test]
    fn test_bounded_policy_exhausts() {
        let mut sensor = StubSensor::new().fail_begin(10);
        let mut delay = RecordingDelay::default();
        let policy = RetryPolicy::bounded(3, Backoff::Fixed { delay_ms: 50 });
        let mut sequencer = SetupSequencer::new(Resolution::X8, policy);
        let mut last_retry = Some(0);

        let result = sequencer.run(&mut sensor, &mut delay, |event| {
            if let SetupEvent::BeginFailed { retry_in_ms, .. } = event {
                last_retry = *retry_in_ms;
            }
        });

        assert_eq!(
            result,
            Err(SetupError::Exhausted {
                stage: Stage::Begin,
                attempts: 3,
                last: StubError::Transient
            })
        );
        assert_eq!(last_retry, None);
        assert_eq!(sensor.begin_calls(), 3);
        assert_eq!(sensor.configure_calls(), 0);
        assert_eq!(delay.delays_ms, [50, 50]);
        assert_eq!(sequencer.phase(), Phase::Uninitialized);
    }

    #[test]
    fn test_permanent_failure_aborts_when_asked() {
        let mut sensor = StubSensor::new().fail_configure_with(StubError::Permanent, 5);
        let mut delay = RecordingDelay::default();
        let policy = RetryPolicy::default().aborting_on_permanent();
        let mut sequencer = SetupSequencer::new(Resolution::X8, policy);

        let result = sequencer.run(&mut sensor, &mut delay, |_| {});

        assert_eq!(
            result,
            Err(SetupError::Permanent {
                stage: Stage::Configure,
                attempt: 1,
                error: StubError::Permanent
            })
        );
        assert_eq!(sequencer.phase(), Phase::Begun);
        assert!(delay.delays_ms.is_empty());
    }

    #[test]
    fn test_permanent_failure_retried_by_default() {
        let mut sensor = StubSensor::new().fail_configure_with(StubError::Permanent, 2);
        let mut delay = RecordingDelay::default();
        let mut sequencer = SetupSequencer::new(Resolution::X8, RetryPolicy::default());
        let mut lines: Vec<String> = Vec::new();

        sequencer
            .run(&mut sensor, &mut delay, |event| {
                if event.is_failure() {
                    lines.push(event.to_string());
                }
            })
            .unwrap();

        assert_eq!(sensor.configure_calls(), 3);
        assert_eq!(lines, ["init error", "init error"]);
        assert_eq!(sequencer.phase(), Phase::Ready);
    }

    #[test]
    fn test_exponential_delays_between_attempts() {
        let mut sensor = StubSensor::new().fail_begin(4);
        let mut delay = RecordingDelay::default();
        let policy = RetryPolicy {
            backoff: Backoff::Exponential {
                initial_ms: 100,
                factor: 2,
                max_ms: 500,
            },
            ..RetryPolicy::default()
        };
        let mut sequencer = SetupSequencer::new(Resolution::X8, policy);

        sequencer.run(&mut sensor, &mut delay, |_| {}).unwrap();
        assert_eq!(delay.delays_ms, [100, 200, 400, 500]);
    }

    #[test]
    fn test_attempts_reset_between_stages() {
        let mut sensor = StubSensor::new().fail_begin(2).fail_configure(2);
        let mut delay = RecordingDelay::default();
        let policy = RetryPolicy::bounded(3, Backoff::Fixed { delay_ms: 1 });
        let mut sequencer = SetupSequencer::new(Resolution::X8, policy);
        let mut reports = Vec::new();

        sequencer
            .run(&mut sensor, &mut delay, |event| match event {
                SetupEvent::Begun { attempts } => reports.push(("begun", *attempts)),
                SetupEvent::Ready { attempts } => reports.push(("ready", *attempts)),
                _ => {}
            })
            .unwrap();

        assert_eq!(reports, [("begun", 3), ("ready", 3)]);
    }

    #[test]
    fn test_ready_is_idempotent() {
        let mut sensor = StubSensor::new();
        let mut delay = RecordingDelay::default();
        let mut sequencer = SetupSequencer::new(Resolution::X8, RetryPolicy::default());

        sequencer.run(&mut sensor, &mut delay, |_| {}).unwrap();
        sequencer.run(&mut sensor, &mut delay, |_| {}).unwrap();
        assert_eq!(sensor.calls.len(), 2);

        sequencer.reset();
        assert_eq!(sequencer.phase(), Phase::Uninitialized);
    }
}
