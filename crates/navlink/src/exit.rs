use std::fmt;

use navlink_cdr::CdrError;
use navlink_client::ClientError;
use navlink_frame::FrameError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const DATA_INVALID: i32 = 60;
pub const NO_INPUT: i32 = 66;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

pub fn client_error(context: &str, err: ClientError) -> CliError {
    let code = match &err {
        ClientError::InvalidConfig(_) => USAGE,
        ClientError::ConnectTimeout(_) => TIMEOUT,
        ClientError::WebSocket(_) => TRANSPORT_ERROR,
        ClientError::Disconnected(_) => FAILURE,
        ClientError::Json(_) => DATA_INVALID,
        ClientError::Worker(_) => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn cdr_error(context: &str, err: CdrError) -> CliError {
    CliError::new(DATA_INVALID, format!("{context}: {err}"))
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    CliError::new(DATA_INVALID, format!("{context}: {err}"))
}
