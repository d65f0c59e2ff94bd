//! One connected session: control-plane handling and frame routing.

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::STOP_TIMEOUT;
use crate::control::{parse_channels, ClientMessage, ServerMessage, StatusLevel};
use crate::dispatch::{DispatchOutcome, FrameDispatcher};
use crate::error::Result;
use crate::event::EventSink;
use crate::registry::SubscriptionRegistry;
use crate::transport::{Transport, WireMessage};

/// Why a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SessionEnd {
    /// Stop was requested.
    Stopped,
    /// The connection closed or failed.
    Closed(String),
}

/// Apply one control message to the registry and return the commands to send.
pub(crate) fn handle_control_text(registry: &mut SubscriptionRegistry, text: &str) -> Vec<ClientMessage> {
    let message = match ServerMessage::parse(text) {
        Ok(message) => message,
        Err(err) => {
            warn!(error = %err, "ignoring malformed control message");
            return Vec::new();
        }
    };

    match message {
        ServerMessage::ServerInfo(info) => {
            info!(
                server = %info.name,
                capabilities = ?info.capabilities,
                encodings = ?info.supported_encodings,
                "server info"
            );
            Vec::new()
        }
        ServerMessage::Advertise { channels } => {
            let advertised = channels.len();
            let channels = parse_channels(channels);
            let added = registry.subscribe_advertised(&channels);
            debug!(advertised, valid = channels.len(), subscribed = added.len(), "channels advertised");
            added.iter().map(ClientMessage::subscribe).collect()
        }
        ServerMessage::Unadvertise { channel_ids } => {
            let removed = registry.remove_channels(&channel_ids);
            debug!(?channel_ids, removed, "channels unadvertised");
            Vec::new()
        }
        ServerMessage::Status { level, message } => {
            match level {
                StatusLevel::Info => info!(%message, "server status"),
                StatusLevel::Warning => warn!(%message, "server status"),
                StatusLevel::Error => error!(%message, "server status"),
            }
            Vec::new()
        }
        ServerMessage::Other => {
            debug!("ignoring unhandled control operation");
            Vec::new()
        }
    }
}

/// Run until the transport closes or `cancel` fires.
pub(crate) async fn run_session(
    transport: &mut dyn Transport,
    registry: &mut SubscriptionRegistry,
    dispatcher: &mut FrameDispatcher,
    events: &dyn EventSink,
    cancel: &CancellationToken,
) -> SessionEnd {
    loop {
        let received = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            received = transport.recv() => Some(received),
        };

        let Some(received) = received else {
            close_gracefully(transport).await;
            return SessionEnd::Stopped;
        };

        match received {
            Some(Ok(WireMessage::Text(text))) => {
                for command in handle_control_text(registry, &text) {
                    if let Err(err) = send_command(transport, &command).await {
                        warn!(error = %err, "failed to send command");
                    }
                }
            }
            Some(Ok(WireMessage::Binary(data))) => {
                if let DispatchOutcome::Decoded(frame) = dispatcher.dispatch(registry, data) {
                    if let Some(event) = frame.into_event() {
                        events.emit(event);
                    }
                }
            }
            Some(Err(err)) => return SessionEnd::Closed(err.to_string()),
            None => return SessionEnd::Closed("connection closed by server".to_string()),
        }
    }
}

async fn send_command(transport: &mut dyn Transport, command: &ClientMessage) -> Result<()> {
    let json = command.to_json()?;
    transport.send_text(json).await
}

async fn close_gracefully(transport: &mut dyn Transport) {
    match tokio::time::timeout(STOP_TIMEOUT, transport.close()).await {
        Ok(Ok(())) => debug!("connection closed"),
        Ok(Err(err)) => debug!(error = %err, "close handshake failed"),
        Err(_) => debug!("close handshake timed out"),
    }
}
