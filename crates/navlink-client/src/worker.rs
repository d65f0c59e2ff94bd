//! The worker loop: connect, run a session, back off, repeat.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::backoff::RetryPolicy;
use crate::dispatch::FrameDispatcher;
use crate::event::{ConnectionState, EventSink, TelemetryEvent};
use crate::registry::SubscriptionRegistry;
use crate::session::{run_session, SessionEnd};
use crate::transport::Connector;

/// State publisher tied to one `start()` generation.
///
/// Once the client moves to a newer generation, writes from an older
/// worker are discarded.
#[derive(Clone)]
pub(crate) struct StatePublisher {
    state: Arc<watch::Sender<ConnectionState>>,
    generation: Arc<AtomicU64>,
    epoch: u64,
}

impl StatePublisher {
    pub(crate) fn new(
        state: Arc<watch::Sender<ConnectionState>>,
        generation: Arc<AtomicU64>,
        epoch: u64,
    ) -> Self {
        Self {
            state,
            generation,
            epoch,
        }
    }

    pub(crate) fn set(&self, next: ConnectionState) {
        self.state.send_if_modified(|current| {
            if self.generation.load(Ordering::SeqCst) != self.epoch || *current == next {
                return false;
            }
            *current = next;
            true
        });
    }
}

pub(crate) struct Worker {
    pub(crate) connector: Arc<dyn Connector>,
    pub(crate) policy: RetryPolicy,
    pub(crate) events: Arc<dyn EventSink>,
    pub(crate) state: StatePublisher,
    pub(crate) cancel: CancellationToken,
}

impl Worker {
    /// Run until stopped or retries are exhausted.
    pub(crate) async fn run(self) {
        let mut registry = SubscriptionRegistry::new();
        let mut retries = 0u32;

        loop {
            registry.clear();
            self.state.set(ConnectionState::Connecting);

            let connected = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                connected = self.connector.connect() => connected,
            };

            match connected {
                Ok(mut transport) => {
                    retries = 0;
                    self.state.set(ConnectionState::Connected);
                    info!("connected");

                    let mut dispatcher = FrameDispatcher::new();
                    let end = run_session(
                        transport.as_mut(),
                        &mut registry,
                        &mut dispatcher,
                        self.events.as_ref(),
                        &self.cancel,
                    )
                    .await;
                    let stats = dispatcher.stats();
                    debug!(
                        decoded = stats.decoded,
                        dropped = stats.dropped,
                        unrouted = stats.unrouted,
                        decode_failed = stats.decode_failed,
                        "session frame totals"
                    );
                    match end {
                        SessionEnd::Stopped => break,
                        SessionEnd::Closed(reason) => warn!(%reason, "connection lost"),
                    }
                }
                Err(err) => warn!(error = %err, retries, "connect failed"),
            }

            let Some((retry, delay)) = self.policy.next_retry(retries) else {
                error!(retries, "reconnect attempts exhausted");
                self.state.set(ConnectionState::Stopped);
                self.events.emit(TelemetryEvent::ConnectionFailed { retries });
                return;
            };
            retries = retry;
            self.state.set(ConnectionState::Reconnecting);
            info!(retry, max_retries = self.policy.max_retries, ?delay, "reconnecting");

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        self.state.set(ConnectionState::Disconnected);
    }
}
