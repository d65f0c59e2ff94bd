use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use navlink_client::{ClientConfig, TelemetryClient, TelemetryEvent};
use tracing::info;

use crate::cmd::{parse_duration, WatchArgs};
use crate::exit::{client_error, CliError, CliResult, INTERNAL, SUCCESS, TRANSPORT_ERROR};
use crate::output::{print_event, OutputFormat};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub fn run(args: WatchArgs, format: OutputFormat) -> CliResult<i32> {
    let config = ClientConfig::new(args.uri, args.subprotocol)
        .with_max_retries(args.max_retries)
        .with_backoff_factor(args.backoff_factor)
        .with_connect_timeout(parse_duration(&args.connect_timeout)?);
    let deadline = match args.duration.as_deref() {
        Some(duration) => Some(Instant::now() + parse_duration(duration)?),
        None => None,
    };

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let (tx, rx) = mpsc::channel();
    let mut client = TelemetryClient::new(config, tx).map_err(|err| client_error("invalid config", err))?;
    client.start().map_err(|err| client_error("start failed", err))?;

    let mut printed = 0usize;
    let outcome = loop {
        if !running.load(Ordering::SeqCst) {
            info!("interrupted");
            break Ok(SUCCESS);
        }
        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            break Ok(SUCCESS);
        }

        let event = match rx.recv_timeout(POLL_INTERVAL) {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                break Err(CliError::new(INTERNAL, "client event channel closed"));
            }
        };

        print_event(&event, format);
        if let TelemetryEvent::ConnectionFailed { retries } = event {
            break Err(CliError::new(
                TRANSPORT_ERROR,
                format!("connection failed after {retries} retries"),
            ));
        }

        printed = printed.saturating_add(1);
        if args.count.is_some_and(|count| printed >= count) {
            break Ok(SUCCESS);
        }
    };

    client.stop();
    outcome
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
