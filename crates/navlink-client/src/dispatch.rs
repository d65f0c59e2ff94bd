//! Routing of binary frames to decoders.

use bytes::Bytes;
use navlink_cdr::{CdrError, DecodedMessage};
use navlink_frame::{BinaryFrame, FrameError};
use tracing::{trace, warn};

use crate::event::TelemetryEvent;
use crate::registry::SubscriptionRegistry;
use crate::topic::WatchedTopic;

/// A binary frame that decoded cleanly.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedFrame {
    pub topic: WatchedTopic,
    pub subscription_id: u32,
    pub timestamp_nanos: u64,
    pub message: DecodedMessage,
}

impl DecodedFrame {
    /// Owner-facing event, or `None` for topics that are not surfaced.
    pub fn into_event(self) -> Option<TelemetryEvent> {
        if !self.topic.is_surfaced() {
            return None;
        }
        Some(match self.message {
            DecodedMessage::Orientation(quaternion) => TelemetryEvent::OrientationUpdated(quaternion),
            DecodedMessage::GeoFix(point) => TelemetryEvent::GeoFixUpdated(point),
            DecodedMessage::DiagnosticMap(statuses) => {
                TelemetryEvent::HealthStatusUpdated { statuses }
            }
        })
    }
}

/// What happened to one binary message.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Decoded(DecodedFrame),
    /// The frame header was unusable.
    Dropped(FrameError),
    /// No subscription with this id on the current connection.
    Unrouted { subscription_id: u32 },
    /// The payload did not decode as the topic's message type.
    DecodeFailed { topic: WatchedTopic, error: CdrError },
}

/// Counters over dispatched frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub decoded: u64,
    pub dropped: u64,
    pub unrouted: u64,
    pub decode_failed: u64,
}

/// Parses binary frames and decodes their payloads by subscribed topic.
///
/// Failures are logged and counted, never propagated: one bad frame must
/// not affect the next.
#[derive(Debug, Default)]
pub struct FrameDispatcher {
    stats: DispatchStats,
}

impl FrameDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    /// Handle one binary message.
    pub fn dispatch(&mut self, registry: &SubscriptionRegistry, data: Bytes) -> DispatchOutcome {
        let frame = match BinaryFrame::parse(data) {
            Ok(frame) => frame,
            Err(err) => {
                warn!(error = %err, "dropping binary frame");
                self.stats.dropped += 1;
                return DispatchOutcome::Dropped(err);
            }
        };

        let Some(topic) = registry.resolve(frame.subscription_id) else {
            trace!(subscription_id = frame.subscription_id, "frame for unknown subscription");
            self.stats.unrouted += 1;
            return DispatchOutcome::Unrouted {
                subscription_id: frame.subscription_id,
            };
        };

        match topic.message_kind().decode(&frame.payload) {
            Ok(message) => {
                trace!(%topic, bytes = frame.wire_size(), "frame decoded");
                self.stats.decoded += 1;
                DispatchOutcome::Decoded(DecodedFrame {
                    topic,
                    subscription_id: frame.subscription_id,
                    timestamp_nanos: frame.timestamp_nanos,
                    message,
                })
            }
            Err(error) => {
                warn!(%topic, error = %error, "failed to decode payload");
                self.stats.decode_failed += 1;
                DispatchOutcome::DecodeFailed { topic, error }
            }
        }
    }
}
