//! Server-to-client binary opcodes.
//!
//! Only message data is consumed; the rest belong to protocol features this
//! client does not implement and are dropped by the frame parser.

/// Message data for an active subscription.
pub const MESSAGE_DATA: u8 = 0x01;

/// Server time broadcast.
pub const TIME: u8 = 0x02;

/// Service call response.
pub const SERVICE_CALL_RESPONSE: u8 = 0x03;

/// Fetch asset response.
pub const FETCH_ASSET_RESPONSE: u8 = 0x04;

/// Returns a human-readable name for an opcode.
pub fn opcode_name(opcode: u8) -> &'static str {
    match opcode {
        MESSAGE_DATA => "MESSAGE_DATA",
        TIME => "TIME",
        SERVICE_CALL_RESPONSE => "SERVICE_CALL_RESPONSE",
        FETCH_ASSET_RESPONSE => "FETCH_ASSET_RESPONSE",
        _ => "UNKNOWN",
    }
}

/// Returns true if the frame parser accepts this opcode.
pub fn is_supported(opcode: u8) -> bool {
    opcode == MESSAGE_DATA
}
