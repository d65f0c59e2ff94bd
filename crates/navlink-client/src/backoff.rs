use std::time::Duration;

use crate::config::{DEFAULT_BACKOFF_FACTOR, DEFAULT_MAX_RETRIES};

/// Bounded exponential reconnect policy.
///
/// Connect failures and unexpected closes share this policy. Retry `n`
/// (1-based) waits `backoff_factor ^ n` seconds; once `max_retries`
/// retries have failed the client stops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff_factor: f64) -> Self {
        Self {
            max_retries,
            backoff_factor,
        }
    }

    /// Wait before retry number `retry`.
    pub fn delay(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        Duration::try_from_secs_f64(self.backoff_factor.powi(exponent)).unwrap_or(Duration::MAX)
    }

    /// Decide what follows a failure after `retries` consecutive retries.
    ///
    /// Returns the next retry number and its delay, or `None` when the
    /// budget is spent.
    pub fn next_retry(&self, retries: u32) -> Option<(u32, Duration)> {
        if retries >= self.max_retries {
            return None;
        }
        let retry = retries + 1;
        Some((retry, self.delay(retry)))
    }
}
