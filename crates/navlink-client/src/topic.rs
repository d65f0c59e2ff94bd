//! The fixed set of topics the client subscribes to.

use std::fmt;

use navlink_cdr::MessageKind;

/// A topic the client subscribes to when the server advertises it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WatchedTopic {
    /// `/gps/heading` (`sensor_msgs/Imu`).
    Heading,
    /// `/gps/fix` (`sensor_msgs/NavSatFix`), decoded but not surfaced.
    Fix,
    /// `/gps/fix_filtered` (`sensor_msgs/NavSatFix`).
    FixFiltered,
    /// `/sensor_status` (`diagnostic_msgs/DiagnosticArray`).
    SensorStatus,
}

/// All watched topics.
pub const WATCHED_TOPICS: [WatchedTopic; 4] = [
    WatchedTopic::Heading,
    WatchedTopic::Fix,
    WatchedTopic::SensorStatus,
    WatchedTopic::FixFiltered,
];

impl WatchedTopic {
    /// Match an advertised topic name.
    pub fn from_topic(topic: &str) -> Option<Self> {
        match topic {
            "/gps/heading" => Some(Self::Heading),
            "/gps/fix" => Some(Self::Fix),
            "/gps/fix_filtered" => Some(Self::FixFiltered),
            "/sensor_status" => Some(Self::SensorStatus),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Heading => "/gps/heading",
            Self::Fix => "/gps/fix",
            Self::FixFiltered => "/gps/fix_filtered",
            Self::SensorStatus => "/sensor_status",
        }
    }

    /// Decoder for this topic's payloads.
    pub fn message_kind(self) -> MessageKind {
        match self {
            Self::Heading => MessageKind::Orientation,
            Self::Fix | Self::FixFiltered => MessageKind::GeoFix,
            Self::SensorStatus => MessageKind::DiagnosticMap,
        }
    }

    /// Whether decoded values reach the owner as events.
    ///
    /// The unfiltered fix is decoded (so malformed payloads still show up
    /// in logs) but only the filtered fix drives position updates.
    pub fn is_surfaced(self) -> bool {
        !matches!(self, Self::Fix)
    }
}

impl fmt::Display for WatchedTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
