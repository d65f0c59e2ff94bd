//! In-memory connector and transport for driving the worker in tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::error::{ClientError, Result};
use crate::transport::{Connector, Transport, WireMessage};

enum Inbound {
    Message(WireMessage),
    Fail(String),
    Close,
}

pub(crate) struct FakeTransport {
    inbox: mpsc::UnboundedReceiver<Inbound>,
    sent: Arc<Mutex<Vec<String>>>,
    closed: Arc<AtomicBool>,
}

/// Test-side end of a [`FakeTransport`].
#[derive(Clone)]
pub(crate) struct FakeHandle {
    inbox: mpsc::UnboundedSender<Inbound>,
    sent: Arc<Mutex<Vec<String>>>,
    closed: Arc<AtomicBool>,
}

impl FakeTransport {
    pub(crate) fn new() -> (Self, FakeHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sent = Arc::new(Mutex::new(Vec::new()));
        let closed = Arc::new(AtomicBool::new(false));
        (
            Self {
                inbox: rx,
                sent: sent.clone(),
                closed: closed.clone(),
            },
            FakeHandle {
                inbox: tx,
                sent,
                closed,
            },
        )
    }
}

impl FakeHandle {
    pub(crate) fn push(&self, message: WireMessage) {
        let _ = self.inbox.send(Inbound::Message(message));
    }

    pub(crate) fn fail(&self, reason: &str) {
        let _ = self.inbox.send(Inbound::Fail(reason.to_string()));
    }

    /// Server-side close.
    pub(crate) fn close(&self) {
        let _ = self.inbox.send(Inbound::Close);
    }

    pub(crate) fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    pub(crate) fn was_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn recv(&mut self) -> Option<Result<WireMessage>> {
        match self.inbox.recv().await? {
            Inbound::Message(message) => Some(Ok(message)),
            Inbound::Fail(reason) => Some(Err(ClientError::Disconnected(reason))),
            Inbound::Close => None,
        }
    }

    async fn send_text(&mut self, text: String) -> Result<()> {
        self.sent.lock().unwrap().push(text);
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Hands out queued transports; refuses once the queue is empty.
#[derive(Default)]
pub(crate) struct FakeConnector {
    queue: Mutex<VecDeque<FakeTransport>>,
    attempts: Mutex<Vec<Instant>>,
    connects: AtomicUsize,
}

impl FakeConnector {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a transport for the next successful connect and return its handle.
    pub(crate) fn accept_next(&self) -> FakeHandle {
        let (transport, handle) = FakeTransport::new();
        self.queue.lock().unwrap().push_back(transport);
        handle
    }

    pub(crate) fn attempts(&self) -> Vec<Instant> {
        self.attempts.lock().unwrap().clone()
    }

    /// Gaps between consecutive connect attempts, in whole seconds.
    pub(crate) fn gaps_secs(&self) -> Vec<u64> {
        self.attempts()
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).as_secs())
            .collect()
    }

    pub(crate) fn successful_connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for FakeConnector {
    async fn connect(&self) -> Result<Box<dyn Transport>> {
        self.attempts.lock().unwrap().push(Instant::now());
        let next = self.queue.lock().unwrap().pop_front();
        match next {
            Some(transport) => {
                self.connects.fetch_add(1, Ordering::SeqCst);
                Ok(Box::new(transport))
            }
            None => Err(ClientError::Disconnected("connection refused".to_string())),
        }
    }
}
