use std::time::Duration;

/// Errors that can occur in the telemetry client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Configuration rejected before any connection was attempted.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// WebSocket handshake or I/O failure.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// The connect attempt did not finish in time.
    #[error("connect timed out after {0:?}")]
    ConnectTimeout(Duration),

    /// JSON serialization/deserialization error on the control plane.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The connection is gone.
    #[error("disconnected: {0}")]
    Disconnected(String),

    /// The worker thread or its runtime could not be created.
    #[error("worker setup failed: {0}")]
    Worker(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;
