//! Little-endian CDR decoding for streamed ROS 2 sensor messages.
//!
//! Payloads arrive with a 4-byte encapsulation header followed by the
//! CDR body. Every primitive is aligned to its own size, measured from the
//! first byte of the body:
//! - integers and `float64` values are little-endian
//! - strings carry a `uint32` length that counts the trailing NUL
//! - sequences carry a `uint32` element count
//!
//! Decoders never panic on malformed input. A short or corrupt payload
//! yields a [`CdrError`] and leaves nothing else affected.

pub mod diagnostic;
pub mod error;
pub mod geo_fix;
pub mod header;
pub mod message;
pub mod orientation;
pub mod reader;

pub use diagnostic::{decode_diagnostic_map, DiagnosticMap};
pub use error::{CdrError, Result};
pub use geo_fix::{decode_geo_fix, GeoFix, GeoPoint};
pub use header::{Header, Time};
pub use message::{DecodedMessage, MessageKind};
pub use orientation::{decode_orientation, Orientation, Quaternion};
pub use reader::{CdrReader, CDR_LE, ENCAPSULATION_HEADER_SIZE};
