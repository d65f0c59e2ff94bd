use std::time::Duration;

use crate::backoff::RetryPolicy;
use crate::error::{ClientError, Result};

/// WebSocket subprotocol spoken by Foxglove bridge servers.
pub const FOXGLOVE_SUBPROTOCOL: &str = "foxglove.websocket.v1";

/// Default number of reconnect attempts before giving up.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Default base of the exponential backoff (`factor ^ retry` seconds).
pub const DEFAULT_BACKOFF_FACTOR: f64 = 2.0;

/// Default bound on a single connect attempt.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// How long `stop()` waits for the worker to acknowledge a disconnect.
pub const STOP_TIMEOUT: Duration = Duration::from_secs(1);

/// Configuration for a [`TelemetryClient`](crate::TelemetryClient).
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Server URI, e.g. `ws://localhost:8765`.
    pub uri: String,
    /// Subprotocol offered in `Sec-WebSocket-Protocol`.
    pub subprotocol: String,
    /// Reconnect attempts after a failure before the client stops for good.
    pub max_retries: u32,
    /// Backoff base: retry `n` waits `backoff_factor ^ n` seconds.
    pub backoff_factor: f64,
    /// Bound on one connect attempt; a timeout counts as a failed attempt.
    pub connect_timeout: Duration,
}

impl ClientConfig {
    /// Create a config with default retry settings.
    pub fn new(uri: impl Into<String>, subprotocol: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            subprotocol: subprotocol.into(),
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Override the retry budget.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Override the backoff base.
    pub fn with_backoff_factor(mut self, backoff_factor: f64) -> Self {
        self.backoff_factor = backoff_factor;
        self
    }

    /// Override the per-attempt connect timeout.
    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// Retry policy derived from this config.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            backoff_factor: self.backoff_factor,
        }
    }

    /// Reject configs the client cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.uri.trim().is_empty() {
            return Err(ClientError::InvalidConfig("uri must not be empty".to_string()));
        }
        if self.subprotocol.trim().is_empty() {
            return Err(ClientError::InvalidConfig(
                "subprotocol must not be empty".to_string(),
            ));
        }
        if !self.backoff_factor.is_finite() || self.backoff_factor < 1.0 {
            return Err(ClientError::InvalidConfig(format!(
                "backoff_factor must be a finite number >= 1 (got {})",
                self.backoff_factor
            )));
        }
        if self.connect_timeout.is_zero() {
            return Err(ClientError::InvalidConfig(
                "connect_timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
