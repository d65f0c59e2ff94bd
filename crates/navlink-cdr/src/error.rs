/// Errors that can occur while decoding a CDR payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CdrError {
    /// A read would run past the end of the buffer.
    #[error("read of {needed} bytes at offset {offset} exceeds buffer ({len} bytes)")]
    OutOfBounds {
        offset: usize,
        needed: usize,
        len: usize,
    },

    /// A string field is not valid UTF-8.
    #[error("invalid UTF-8 in string at offset {offset}")]
    InvalidUtf8 { offset: usize },

    /// The payload is too short to carry the 4-byte encapsulation header.
    #[error("payload too short for encapsulation header ({len} bytes)")]
    MissingEncapsulation { len: usize },

    /// The encapsulation header announces a representation this reader cannot decode.
    #[error("unsupported CDR representation 0x{0:04x} (expected little-endian)")]
    UnsupportedRepresentation(u16),
}

pub type Result<T> = std::result::Result<T, CdrError>;
