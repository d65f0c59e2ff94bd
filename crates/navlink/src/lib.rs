//! Live robot telemetry over a Foxglove-style WebSocket.
//!
//! # Crate Structure
//!
//! - [`cdr`] - Aligned CDR reader and the orientation, fix, and diagnostics decoders
//! - [`frame`] - Binary data-plane frame header parsing
//! - [`client`] - Reconnecting client: subscriptions, dispatch, and events
//!
//! ```no_run
//! use std::sync::mpsc;
//!
//! use navlink::client::{ClientConfig, TelemetryClient, FOXGLOVE_SUBPROTOCOL};
//!
//! # fn main() -> navlink::client::Result<()> {
//! let (tx, rx) = mpsc::channel();
//! let mut client = TelemetryClient::new(
//!     ClientConfig::new("ws://localhost:8765", FOXGLOVE_SUBPROTOCOL),
//!     tx,
//! )?;
//! client.start()?;
//! for event in rx.iter().take(10) {
//!     println!("{}", event.name());
//! }
//! client.stop();
//! # Ok(())
//! # }
//! ```

/// Re-export CDR decoding types.
pub mod cdr {
    pub use navlink_cdr::*;
}

/// Re-export binary frame types.
pub mod frame {
    pub use navlink_frame::*;
}

/// Re-export client types.
pub mod client {
    pub use navlink_client::*;
}
