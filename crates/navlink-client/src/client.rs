//! Owner-facing client handle.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::{ClientConfig, STOP_TIMEOUT};
use crate::error::Result;
use crate::event::{ConnectionState, EventSink};
use crate::transport::{Connector, WsConnector};
use crate::worker::{StatePublisher, Worker};

struct WorkerHandle {
    cancel: CancellationToken,
    done: mpsc::Receiver<()>,
    thread: JoinHandle<()>,
}

/// A reconnecting telemetry client.
///
/// Each [`start`](Self::start) spawns one worker thread with its own
/// single-threaded runtime; that thread owns the socket, the subscription
/// registry, and the retry counter. Events are delivered to the
/// [`EventSink`] from the worker thread.
///
/// Dropping the client stops it.
pub struct TelemetryClient {
    config: ClientConfig,
    connector: Arc<dyn Connector>,
    events: Arc<dyn EventSink>,
    state: Arc<watch::Sender<ConnectionState>>,
    running: Arc<AtomicBool>,
    generation: Arc<AtomicU64>,
    worker: Option<WorkerHandle>,
}

impl TelemetryClient {
    /// Create a client that connects over WebSocket.
    pub fn new(config: ClientConfig, events: impl EventSink + 'static) -> Result<Self> {
        let connector = Arc::new(WsConnector::from_config(&config));
        Self::with_connector(config, connector, events)
    }

    /// Create a client with a custom connector.
    pub fn with_connector(
        config: ClientConfig,
        connector: Arc<dyn Connector>,
        events: impl EventSink + 'static,
    ) -> Result<Self> {
        config.validate()?;
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        Ok(Self {
            config,
            connector,
            events: Arc::new(events),
            state: Arc::new(state),
            running: Arc::new(AtomicBool::new(false)),
            generation: Arc::new(AtomicU64::new(0)),
            worker: None,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Subscribe to connection state changes.
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    /// Whether a worker is active (connecting, connected, or backing off).
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Start connecting. A no-op while already running.
    pub fn start(&mut self) -> Result<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            debug!("start ignored, client already running");
            return Ok(());
        }

        // A worker that gave up on its own has already exited.
        if let Some(previous) = self.worker.take() {
            let _ = previous.thread.join();
        }

        match self.spawn_worker() {
            Ok(worker) => {
                self.worker = Some(worker);
                info!(uri = %self.config.uri, "client started");
                Ok(())
            }
            Err(err) => {
                self.running.store(false, Ordering::SeqCst);
                Err(err)
            }
        }
    }

    fn spawn_worker(&self) -> Result<WorkerHandle> {
        let epoch = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let cancel = CancellationToken::new();
        let worker = Worker {
            connector: self.connector.clone(),
            policy: self.config.retry_policy(),
            events: self.events.clone(),
            state: StatePublisher::new(self.state.clone(), self.generation.clone(), epoch),
            cancel: cancel.clone(),
        };

        let (done_tx, done) = mpsc::channel();
        let running = self.running.clone();
        let generation = self.generation.clone();
        let thread = thread::Builder::new()
            .name("navlink-worker".to_string())
            .spawn(move || {
                runtime.block_on(worker.run());
                if generation.load(Ordering::SeqCst) == epoch {
                    running.store(false, Ordering::SeqCst);
                }
                let _ = done_tx.send(());
            })?;

        Ok(WorkerHandle {
            cancel,
            done,
            thread,
        })
    }

    /// Stop the client and disconnect.
    ///
    /// Blocks for at most [`STOP_TIMEOUT`] waiting for the worker to close
    /// the connection. The client ends up `Disconnected` and never
    /// reconnects on its own afterwards.
    pub fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };

        // Retire this worker's state writes before waking it.
        self.generation.fetch_add(1, Ordering::SeqCst);
        worker.cancel.cancel();

        match worker.done.recv_timeout(STOP_TIMEOUT) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                let _ = worker.thread.join();
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!(timeout = ?STOP_TIMEOUT, "worker did not acknowledge stop, detaching");
            }
        }

        self.running.store(false, Ordering::SeqCst);
        self.state.send_replace(ConnectionState::Disconnected);
        info!("client stopped");
    }
}

impl Drop for TelemetryClient {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use bytes::BytesMut;
    use navlink_frame::encode_frame;

    use super::*;
    use crate::event::TelemetryEvent;
    use crate::testing::FakeConnector;
    use crate::transport::WireMessage;

    const IMU_GPS_LEFT_LINK: &[u8] =
        include_bytes!("../../navlink-cdr/tests/fixtures/imu_gps_left_link.cdr");

    fn wait_for(client: &TelemetryClient, state: ConnectionState) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while client.state() != state {
            assert!(Instant::now() < deadline, "timed out waiting for {state}");
            thread::sleep(Duration::from_millis(5));
        }
    }

    fn config() -> ClientConfig {
        ClientConfig::new("ws://127.0.0.1:8765", "foxglove.websocket.v1")
    }

    #[test]
    fn rejects_invalid_config() {
        let (tx, _rx) = mpsc::channel::<TelemetryEvent>();
        let result = TelemetryClient::with_connector(
            config().with_backoff_factor(0.5),
            FakeConnector::new(),
            tx,
        );
        assert!(result.is_err());
    }

    #[test]
    fn second_start_is_a_no_op() {
        let connector = FakeConnector::new();
        let session = connector.accept_next();
        session.push(WireMessage::Text(
            r#"{"op":"advertise","channels":[{"id":2,"topic":"/gps/heading"}]}"#.to_string(),
        ));

        let (tx, rx) = mpsc::channel();
        let mut client = TelemetryClient::with_connector(config(), connector.clone(), tx).unwrap();
        assert_eq!(client.state(), ConnectionState::Disconnected);

        client.start().unwrap();
        wait_for(&client, ConnectionState::Connected);
        client.start().unwrap();
        assert!(client.is_running());

        // The subscription made before the second start still routes.
        let mut buf = BytesMut::new();
        encode_frame(2, 0, IMU_GPS_LEFT_LINK, &mut buf);
        session.push(WireMessage::Binary(buf.freeze()));

        let event = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(event, TelemetryEvent::OrientationUpdated(_)));
        assert_eq!(connector.attempts().len(), 1);

        client.stop();
        assert_eq!(client.state(), ConnectionState::Disconnected);
        assert!(!client.is_running());
        assert!(session.was_closed());
    }

    #[test]
    fn stop_during_backoff_returns_quickly() {
        let connector = FakeConnector::new();
        let (tx, rx) = mpsc::channel();
        let mut client = TelemetryClient::with_connector(
            config().with_backoff_factor(30.0),
            connector.clone(),
            tx,
        )
        .unwrap();

        client.start().unwrap();
        wait_for(&client, ConnectionState::Reconnecting);

        let started = Instant::now();
        client.stop();
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(client.state(), ConnectionState::Disconnected);
        assert_eq!(connector.attempts().len(), 1);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn exhausted_client_can_restart() {
        let connector = FakeConnector::new();
        let (tx, rx) = mpsc::channel();
        let mut client =
            TelemetryClient::with_connector(config().with_max_retries(0), connector.clone(), tx).unwrap();

        client.start().unwrap();
        let event = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(event, TelemetryEvent::ConnectionFailed { retries: 0 });
        wait_for(&client, ConnectionState::Stopped);

        let deadline = Instant::now() + Duration::from_secs(5);
        while client.is_running() {
            assert!(Instant::now() < deadline);
            thread::sleep(Duration::from_millis(5));
        }

        client.start().unwrap();
        let event = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(event, TelemetryEvent::ConnectionFailed { retries: 0 });
        assert_eq!(connector.attempts().len(), 2);
    }

    #[test]
    fn stop_without_start_is_harmless() {
        let (tx, _rx) = mpsc::channel::<TelemetryEvent>();
        let mut client = TelemetryClient::with_connector(config(), FakeConnector::new(), tx).unwrap();
        client.stop();
        assert_eq!(client.state(), ConnectionState::Disconnected);
    }
}
