//! # Retry Policy
//!
//! Explicit, injectable retry behavior for provider calls.
//!
//! ```text
//!   attempt 1 ──✗ timeout──► wait ~initial ──► attempt 2 ──✗──► wait ~2×initial ──► ...
//!                                                   (capped at max_backoff)
//!
//!   Only timeout/transport failures are retried. NotFound and malformed
//!   responses end the lookup on the first attempt.
//! ```

use backoff::ExponentialBackoff;
use std::time::Duration;

use crate::config::RetrySettings;

/// How many extra attempts to make and how long to wait between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first.
    pub max_retries: u32,

    pub initial_backoff: Duration,

    pub max_backoff: Duration,
}

impl RetryPolicy {
    /// Exactly one attempt.
    pub fn none() -> Self {
        RetryPolicy {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Total attempts including the first.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Builds a fresh backoff schedule for one lookup.
    pub fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            current_interval: self.initial_backoff,
            initial_interval: self.initial_backoff,
            max_interval: self.max_backoff,
            multiplier: 2.0,
            max_elapsed_time: None,
            ..Default::default()
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::from(&RetrySettings::default())
    }
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(settings: &RetrySettings) -> Self {
        RetryPolicy {
            max_retries: settings.max_retries,
            initial_backoff: Duration::from_millis(settings.initial_backoff_ms),
            max_backoff: Duration::from_millis(settings.max_backoff_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoff::backoff::Backoff;

    #[test]
    fn test_default_is_single_attempt() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 0);
        assert_eq!(policy.max_attempts(), 1);
        assert_eq!(RetryPolicy::none().max_attempts(), 1);
    }

    #[test]
    fn test_from_settings() {
        let policy = RetryPolicy::from(&RetrySettings {
            max_retries: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 1000,
        });
        assert_eq!(policy.max_attempts(), 4);
        assert_eq!(policy.initial_backoff, Duration::from_millis(100));
    }

    #[test]
    fn test_backoff_stays_within_bounds() {
        let policy = RetryPolicy {
            max_retries: 5,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_millis(400),
        };
        let mut backoff = policy.backoff();

        // Randomization is ±50% around the current interval
        let first = backoff.next_backoff().unwrap();
        assert!(first >= Duration::from_millis(50) && first <= Duration::from_millis(150));

        for _ in 0..10 {
            let next = backoff.next_backoff().unwrap();
            assert!(next <= Duration::from_millis(600));
        }
    }
}
