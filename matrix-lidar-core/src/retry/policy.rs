//! Retry policy and backoff schedule

use crate::config::ConfigError;

/// Delay between setup attempts when nothing else is configured
pub const DEFAULT_RETRY_DELAY_MS: u32 = 1000;

/// Upper bound on exponential delays when nothing else is configured
pub const DEFAULT_MAX_DELAY_MS: u32 = 30_000;

/// Wait schedule between failed attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Backoff {
    /// Same delay after every failure
    Fixed { delay_ms: u32 },
    /// `initial_ms * factor^(n-1)` after the n-th failure, capped at `max_ms`
    Exponential {
        initial_ms: u32,
        factor: u32,
        max_ms: u32,
    },
}

impl Default for Backoff {
    fn default() -> Self {
        Backoff::Fixed {
            delay_ms: DEFAULT_RETRY_DELAY_MS,
        }
    }
}

impl Backoff {
    /// Delay to wait after the given failure (1-based)
    pub fn delay_ms(&self, failure: u32) -> u32 {
        match *self {
            Backoff::Fixed { delay_ms } => delay_ms,
            Backoff::Exponential {
                initial_ms,
                factor,
                max_ms,
            } => {
                let mut delay = initial_ms;
                for _ in 1..failure {
                    if delay >= max_ms {
                        break;
                    }
                    delay = delay.saturating_mul(factor);
                }
                delay.min(max_ms)
            }
        }
    }
}

/// How setup failures are retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(from = "RetrySettings")
)]
pub struct RetryPolicy {
    /// Attempts per setup stage; `None` retries forever
    pub max_attempts: Option<u32>,
    /// Wait schedule between attempts
    pub backoff: Backoff,
    /// Stop at the first failure classified as permanent; off by
    /// default, so every failure is retried
    pub abort_on_permanent: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: None,
            backoff: Backoff::default(),
            abort_on_permanent: false,
        }
    }
}

impl RetryPolicy {
    /// Retry forever with a fixed delay
    pub const fn unbounded(delay_ms: u32) -> Self {
        Self {
            max_attempts: None,
            backoff: Backoff::Fixed { delay_ms },
            abort_on_permanent: false,
        }
    }

    /// Give up after `max_attempts` attempts per stage
    pub const fn bounded(max_attempts: u32, backoff: Backoff) -> Self {
        Self {
            max_attempts: Some(max_attempts),
            backoff,
            abort_on_permanent: false,
        }
    }

    /// Also stop at the first failure classified as permanent
    pub const fn aborting_on_permanent(self) -> Self {
        Self {
            abort_on_permanent: true,
            ..self
        }
    }

    /// Check whether another attempt may follow `attempts` failed ones
    pub fn allows_retry(&self, attempts: u32) -> bool {
        self.max_attempts.map_or(true, |max| attempts < max)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == Some(0) {
            return Err(ConfigError::ZeroAttempts);
        }
        if let Backoff::Exponential {
            initial_ms,
            factor,
            max_ms,
        } = self.backoff
        {
            if factor < 2 {
                return Err(ConfigError::BackoffFactor(factor));
            }
            if max_ms < initial_ms {
                return Err(ConfigError::BackoffCap {
                    initial_ms,
                    max_ms,
                });
            }
        }
        Ok(())
    }
}

/// Backoff schedule selector in configuration files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum BackoffKind {
    #[default]
    Fixed,
    Exponential,
}

/// Flat form of [`RetryPolicy`] as written in the `[retry]` table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct RetrySettings {
    /// 0 means unbounded
    pub max_attempts: u32,
    pub delay_ms: u32,
    pub backoff: BackoffKind,
    pub factor: u32,
    pub max_delay_ms: u32,
    pub abort_on_permanent: bool,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 0,
            delay_ms: DEFAULT_RETRY_DELAY_MS,
            backoff: BackoffKind::Fixed,
            factor: 2,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
            abort_on_permanent: false,
        }
    }
}

impl From<RetrySettings> for RetryPolicy {
    fn from(settings: RetrySettings) -> Self {
        let backoff = match settings.backoff {
            BackoffKind::Fixed => Backoff::Fixed {
                delay_ms: settings.delay_ms,
            },
            BackoffKind::Exponential => Backoff::Exponential {
                initial_ms: settings.delay_ms,
                factor: settings.factor,
                max_ms: settings.max_delay_ms,
            },
        };

        Self {
            max_attempts: (settings.max_attempts != 0).then_some(settings.max_attempts),
            backoff,
            abort_on_permanent: settings.abort_on_permanent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, None);
        assert_eq!(policy.backoff.delay_ms(1), 1000);
        assert_eq!(policy.backoff.delay_ms(50), 1000);
        assert!(!policy.abort_on_permanent);
        assert!(policy.allows_retry(u32::MAX));
        assert!(RetryPolicy::default().aborting_on_permanent().abort_on_permanent);
    }

    #[test]
    fn test_bounded_allows_retry() {
        let policy = RetryPolicy::bounded(3, Backoff::default());
        assert!(policy.allows_retry(1));
        assert!(policy.allows_retry(2));
        assert!(!policy.allows_retry(3));
    }

    #[test]
    fn test_exponential_schedule() {
        let backoff = Backoff::Exponential {
            initial_ms: 100,
            factor: 2,
            max_ms: 1000,
        };
        assert_eq!(backoff.delay_ms(1), 100);
        assert_eq!(backoff.delay_ms(2), 200);
        assert_eq!(backoff.delay_ms(4), 800);
        assert_eq!(backoff.delay_ms(5), 1000);
        assert_eq!(backoff.delay_ms(1000), 1000);
    }

    #[test]
    fn test_validate() {
        assert!(RetryPolicy::default().validate().is_ok());
        assert_eq!(
            RetryPolicy::bounded(0, Backoff::default()).validate(),
            Err(ConfigError::ZeroAttempts)
        );

        let policy = RetryPolicy::bounded(
            5,
            Backoff::Exponential {
                initial_ms: 500,
                factor: 1,
                max_ms: 1000,
            },
        );
        assert_eq!(policy.validate(), Err(ConfigError::BackoffFactor(1)));

        let policy = RetryPolicy::bounded(
            5,
            Backoff::Exponential {
                initial_ms: 500,
                factor: 2,
                max_ms: 100,
            },
        );
        assert_eq!(
            policy.validate(),
            Err(ConfigError::BackoffCap {
                initial_ms: 500,
                max_ms: 100
            })
        );
    }

    #[test]
    fn test_settings_conversion() {
        let policy = RetryPolicy::from(RetrySettings::default());
        assert_eq!(policy, RetryPolicy::default());

        let policy = RetryPolicy::from(RetrySettings {
            max_attempts: 4,
            delay_ms: 250,
            backoff: BackoffKind::Exponential,
            factor: 3,
            max_delay_ms: 5000,
            abort_on_permanent: true,
        });
        assert_eq!(policy.max_attempts, Some(4));
        assert_eq!(
            policy.backoff,
            Backoff::Exponential {
                initial_ms: 250,
                factor: 3,
                max_ms: 5000
            }
        );
        assert!(policy.abort_on_permanent);
    }

    proptest! {
        #[test]
        fn test_exponential_never_exceeds_cap(
            initial_ms in 0u32..10_000,
            factor in 2u32..10,
            max_ms in 0u32..100_000,
            failure in 1u32..200,
        ) {
            let backoff = Backoff::Exponential { initial_ms, factor, max_ms };
            prop_assert!(backoff.delay_ms(failure) <= max_ms);
        }

        #[test]
        fn test_exponential_is_monotonic(
            initial_ms in 1u32..10_000,
            factor in 2u32..10,
            failure in 1u32..100,
        ) {
            let backoff = Backoff::Exponential { initial_ms, factor, max_ms: u32::MAX };
            prop_assert!(backoff.delay_ms(failure + 1) >= backoff.delay_ms(failure));
        }
    }
}
