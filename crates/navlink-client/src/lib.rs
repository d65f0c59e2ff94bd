//! Reconnecting telemetry client for a Foxglove-style WebSocket server.
//!
//! One worker thread per [`TelemetryClient`] owns the socket. It drives the
//! connect/backoff state machine, subscribes to advertised channels whose
//! topics are watched, and decodes binary frames into [`TelemetryEvent`]s
//! delivered to the owner's [`EventSink`].
//!
//! The owner talks to the client only through [`TelemetryClient::start`],
//! [`TelemetryClient::stop`], the event sink, and the state watch.

pub mod backoff;
pub mod client;
pub mod config;
pub mod control;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod registry;
pub mod topic;
pub mod transport;

mod session;
mod worker;

#[cfg(test)]
mod testing;

pub use backoff::RetryPolicy;
pub use client::TelemetryClient;
pub use config::{
    ClientConfig, DEFAULT_BACKOFF_FACTOR, DEFAULT_CONNECT_TIMEOUT, DEFAULT_MAX_RETRIES,
    FOXGLOVE_SUBPROTOCOL, STOP_TIMEOUT,
};
pub use control::{Channel, ClientMessage, ServerInfo, ServerMessage, StatusLevel, SubscribeRequest};
pub use dispatch::{DecodedFrame, DispatchOutcome, DispatchStats, FrameDispatcher};
pub use error::{ClientError, Result};
pub use event::{ConnectionState, EventSink, TelemetryEvent};
pub use registry::{Subscription, SubscriptionRegistry};
pub use topic::{WatchedTopic, WATCHED_TOPICS};
pub use transport::{Connector, Transport, WireMessage, WsConnector};
