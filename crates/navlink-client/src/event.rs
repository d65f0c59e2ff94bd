//! Events delivered to the client's owner, and connection state.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::mpsc;

use navlink_cdr::{GeoPoint, Quaternion};
use serde::Serialize;
use tokio::sync::mpsc as tokio_mpsc;

/// A notification for the client's owner.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum TelemetryEvent {
    OrientationUpdated(Quaternion),
    GeoFixUpdated(GeoPoint),
    HealthStatusUpdated { statuses: BTreeMap<String, String> },
    /// Retries exhausted; the client has stopped.
    ConnectionFailed { retries: u32 },
}

impl TelemetryEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::OrientationUpdated(_) => "orientation-updated",
            Self::GeoFixUpdated(_) => "geo-fix-updated",
            Self::HealthStatusUpdated { .. } => "health-status-updated",
            Self::ConnectionFailed { .. } => "connection-failed",
        }
    }
}

/// Receiver side of client events.
///
/// Called from the worker thread, in frame arrival order.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: TelemetryEvent);
}

impl EventSink for tokio_mpsc::UnboundedSender<TelemetryEvent> {
    fn emit(&self, event: TelemetryEvent) {
        // A dropped receiver means nobody is listening any more.
        let _ = self.send(event);
    }
}

impl EventSink for mpsc::Sender<TelemetryEvent> {
    fn emit(&self, event: TelemetryEvent) {
        let _ = self.send(event);
    }
}

/// Connection lifecycle as observed by the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting,
    /// Retries exhausted.
    Stopped,
}

impl ConnectionState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Reconnecting => "reconnecting",
            Self::Stopped => "stopped",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
