use std::collections::BTreeMap;

use crate::diagnostic::decode_diagnostic_map;
use crate::error::Result;
use crate::geo_fix::{decode_geo_fix, GeoPoint};
use crate::orientation::{decode_orientation, Quaternion};

/// Which decoder a payload needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// `sensor_msgs/Imu`, surfaced as its orientation quaternion.
    Orientation,
    /// `sensor_msgs/NavSatFix`, surfaced as latitude/longitude/altitude.
    GeoFix,
    /// `diagnostic_msgs/DiagnosticArray`, surfaced as `name -> message`.
    DiagnosticMap,
}

impl MessageKind {
    /// Decode `payload` and keep only the surfaced values.
    pub fn decode(self, payload: &[u8]) -> Result<DecodedMessage> {
        match self {
            MessageKind::Orientation => {
                decode_orientation(payload).map(|m| DecodedMessage::Orientation(m.quaternion))
            }
            MessageKind::GeoFix => decode_geo_fix(payload).map(|m| DecodedMessage::GeoFix(m.position)),
            MessageKind::DiagnosticMap => {
                decode_diagnostic_map(payload).map(|m| DecodedMessage::DiagnosticMap(m.statuses))
            }
        }
    }
}

/// Values surfaced from one decoded payload.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedMessage {
    Orientation(Quaternion),
    GeoFix(GeoPoint),
    DiagnosticMap(BTreeMap<String, String>),
}

impl DecodedMessage {
    pub fn kind(&self) -> MessageKind {
        match self {
            DecodedMessage::Orientation(_) => MessageKind::Orientation,
            DecodedMessage::GeoFix(_) => MessageKind::GeoFix,
            DecodedMessage::DiagnosticMap(_) => MessageKind::DiagnosticMap,
        }
    }
}
