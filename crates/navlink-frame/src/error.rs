use crate::opcode::opcode_name;

/// Errors that can occur while parsing a binary frame.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// The message is shorter than the fixed header.
    #[error("binary frame too short ({len} bytes, need at least 13)")]
    TooShort { len: usize },

    /// The opcode is not one this client handles.
    #[error("unsupported opcode 0x{0:02x} ({name})", name = opcode_name(*.0))]
    UnsupportedOpcode(u8),
}

pub type Result<T> = std::result::Result<T, FrameError>;
