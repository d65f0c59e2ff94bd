use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};
use navlink_client::{DEFAULT_BACKOFF_FACTOR, DEFAULT_MAX_RETRIES, FOXGLOVE_SUBPROTOCOL};

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod decode;
pub mod version;
pub mod watch;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Connect to a server and print decoded telemetry events.
    Watch(WatchArgs),
    /// Decode a captured payload file.
    Decode(DecodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Watch(args) => watch::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Server WebSocket URI (e.g. ws://robot.local:8765).
    #[arg(long, env = "NAVLINK_URI")]
    pub uri: String,
    /// WebSocket subprotocol to offer.
    #[arg(long, env = "NAVLINK_SUBPROTOCOL", default_value = FOXGLOVE_SUBPROTOCOL)]
    pub subprotocol: String,
    /// Reconnect attempts before giving up.
    #[arg(long, default_value_t = DEFAULT_MAX_RETRIES)]
    pub max_retries: u32,
    /// Retry n waits backoff_factor^n seconds.
    #[arg(long, default_value_t = DEFAULT_BACKOFF_FACTOR)]
    pub backoff_factor: f64,
    /// Per-attempt connect timeout (e.g. 10s, 500ms).
    #[arg(long, default_value = "10s")]
    pub connect_timeout: String,
    /// Exit after printing N events.
    #[arg(long)]
    pub count: Option<usize>,
    /// Exit after this long (e.g. 30s, 1500ms).
    #[arg(long)]
    pub duration: Option<String>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// File holding one CDR payload (or a full binary frame with --frame).
    pub path: PathBuf,
    /// Topic the payload was published on.
    #[arg(long, short = 't')]
    pub topic: String,
    /// The file starts with the 13-byte binary frame header.
    #[arg(long)]
    pub frame: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Parse `500ms`, `5s`, or a bare number of seconds.
pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, false)
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration: {input}")))?;
    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    Ok(if millis {
        Duration::from_millis(value)
    } else {
        Duration::from_secs(value)
    })
}
