//! Binary data-plane framing for streamed telemetry.
//!
//! Every binary WebSocket message from the server carries a fixed header:
//! - A 1-byte opcode (only [`MESSAGE_DATA`] is accepted)
//! - A 4-byte little-endian subscription id
//! - An 8-byte little-endian receive timestamp in nanoseconds
//!
//! The rest of the message is the CDR payload for that subscription.

pub mod codec;
pub mod error;
pub mod opcode;

pub use codec::{encode_frame, BinaryFrame, HEADER_SIZE};
pub use error::{FrameError, Result};
pub use opcode::{opcode_name, MESSAGE_DATA};
