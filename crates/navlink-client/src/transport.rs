//! Connection seams between the worker and the network.
//!
//! The worker only sees [`Connector`] and [`Transport`]; [`WsConnector`]
//! is the real WebSocket implementation.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::SEC_WEBSOCKET_PROTOCOL;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, trace};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

/// A message the worker cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireMessage {
    Text(String),
    Binary(Bytes),
}

/// One open connection.
#[async_trait]
pub trait Transport: Send {
    /// Next data message. `None` once the peer has closed.
    async fn recv(&mut self) -> Option<Result<WireMessage>>;

    async fn send_text(&mut self, text: String) -> Result<()>;

    /// Close the connection.
    async fn close(&mut self) -> Result<()>;
}

/// Opens transports.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn Transport>>;
}

/// Connects over WebSocket, offering a single subprotocol.
#[derive(Debug, Clone)]
pub struct WsConnector {
    uri: String,
    subprotocol: String,
    connect_timeout: Duration,
}

impl WsConnector {
    pub fn new(uri: impl Into<String>, subprotocol: impl Into<String>, connect_timeout: Duration) -> Self {
        Self {
            uri: uri.into(),
            subprotocol: subprotocol.into(),
            connect_timeout,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.uri, &config.subprotocol, config.connect_timeout)
    }
}

#[async_trait]
impl Connector for WsConnector {
    async fn connect(&self) -> Result<Box<dyn Transport>> {
        let mut request = self.uri.as_str().into_client_request()?;
        let protocol = HeaderValue::from_str(&self.subprotocol)
            .map_err(|err| ClientError::InvalidConfig(format!("subprotocol: {err}")))?;
        request.headers_mut().insert(SEC_WEBSOCKET_PROTOCOL, protocol);

        let (stream, response) =
            tokio::time::timeout(self.connect_timeout, tokio_tungstenite::connect_async(request))
                .await
                .map_err(|_| ClientError::ConnectTimeout(self.connect_timeout))??;

        debug!(
            uri = %self.uri,
            status = %response.status(),
            protocol = ?response.headers().get(SEC_WEBSOCKET_PROTOCOL),
            "websocket connected"
        );

        let (sink, stream) = stream.split();
        Ok(Box::new(WsTransport { sink, stream }))
    }
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

struct WsTransport {
    sink: SplitSink<WsStream, Message>,
    stream: SplitStream<WsStream>,
}

#[async_trait]
impl Transport for WsTransport {
    async fn recv(&mut self) -> Option<Result<WireMessage>> {
        loop {
            match self.stream.next().await? {
                Ok(Message::Text(text)) => return Some(Ok(WireMessage::Text(text))),
                Ok(Message::Binary(data)) => return Some(Ok(WireMessage::Binary(Bytes::from(data)))),
                Ok(Message::Ping(data)) => {
                    if let Err(err) = self.sink.send(Message::Pong(data)).await {
                        return Some(Err(err.into()));
                    }
                }
                Ok(Message::Close(frame)) => {
                    debug!(?frame, "server closed connection");
                    return None;
                }
                Ok(other) => trace!(?other, "ignoring websocket message"),
                Err(err) => return Some(Err(err.into())),
            }
        }
    }

    async fn send_text(&mut self, text: String) -> Result<()> {
        self.sink.send(Message::Text(text)).await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.sink.send(Message::Close(None)).await?;
        // Drain until the peer acknowledges the close.
        while let Some(message) = self.stream.next().await {
            if message.is_err() {
                break;
            }
        }
        Ok(())
    }
}
