//! Control-plane (text) messages.
//!
//! Only the operations the client acts on are modelled; everything else a
//! server may send parses as [`ServerMessage::Other`] and is ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::registry::Subscription;

/// A server-declared stream available for subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: u32,
    pub topic: String,
    #[serde(default)]
    pub encoding: String,
    #[serde(default)]
    pub schema_name: String,
}

/// `serverInfo` payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub capabilities: Vec<String>,
    #[serde(default)]
    pub supported_encodings: Vec<String>,
}

/// Severity of a server `status` notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "u8")]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

impl From<u8> for StatusLevel {
    fn from(level: u8) -> Self {
        match level {
            0 => Self::Info,
            1 => Self::Warning,
            _ => Self::Error,
        }
    }
}

/// Text messages sent by the server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum ServerMessage {
    ServerInfo(ServerInfo),
    /// Channel descriptors stay raw so one bad entry cannot sink the rest;
    /// see [`parse_channels`].
    Advertise {
        channels: Vec<Value>,
    },
    Unadvertise {
        #[serde(rename = "channelIds")]
        channel_ids: Vec<u32>,
    },
    Status {
        level: StatusLevel,
        message: String,
    },
    #[serde(other)]
    Other,
}

impl ServerMessage {
    /// Parse one text message.
    pub fn parse(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

/// Convert advertised descriptors, skipping entries that do not parse.
pub fn parse_channels(raw: Vec<Value>) -> Vec<Channel> {
    raw.into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match Channel::deserialize(entry) {
            Ok(channel) => Some(channel),
            Err(err) => {
                warn!(index, error = %err, "skipping malformed channel descriptor");
                None
            }
        })
        .collect()
}

/// One entry of a `subscribe` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    pub id: u32,
    pub channel_id: u32,
}

/// Text messages sent by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum ClientMessage {
    Subscribe { subscriptions: Vec<SubscribeRequest> },
}

impl ClientMessage {
    /// Subscribe request for a single registry entry.
    pub fn subscribe(subscription: &Subscription) -> Self {
        Self::Subscribe {
            subscriptions: vec![SubscribeRequest {
                id: subscription.id,
                channel_id: subscription.channel_id,
            }],
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
