use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};
use crate::opcode::{is_supported, MESSAGE_DATA};

/// Frame header: opcode (1) + subscription id (4) + timestamp (8) = 13 bytes.
pub const HEADER_SIZE: usize = 13;

/// One binary data-plane message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryFrame {
    /// Always [`MESSAGE_DATA`] for a parsed frame.
    pub opcode: u8,
    /// Client-chosen subscription id the payload belongs to.
    pub subscription_id: u32,
    /// Server receive time in nanoseconds.
    pub timestamp_nanos: u64,
    /// CDR payload, encapsulation header included.
    pub payload: Bytes,
}

impl BinaryFrame {
    /// Parse a binary message.
    ///
    /// Wire format:
    /// ```text
    /// ┌──────────┬──────────────────┬──────────────────┬─────────────────┐
    /// │ Opcode   │ Subscription id  │ Timestamp (ns)   │ Payload          │
    /// │ (1B)     │ (4B LE)          │ (8B LE)          │ (remaining)      │
    /// │ 0x01     │                  │                  │                  │
    /// └──────────┴──────────────────┴──────────────────┴─────────────────┘
    /// ```
    ///
    /// The payload is a zero-copy slice of `data`.
    pub fn parse(data: Bytes) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(FrameError::TooShort { len: data.len() });
        }

        let opcode = data[0];
        if !is_supported(opcode) {
            return Err(FrameError::UnsupportedOpcode(opcode));
        }

        let mut subscription_id = [0u8; 4];
        subscription_id.copy_from_slice(&data[1..5]);
        let mut timestamp = [0u8; 8];
        timestamp.copy_from_slice(&data[5..HEADER_SIZE]);

        Ok(Self {
            opcode,
            subscription_id: u32::from_le_bytes(subscription_id),
            timestamp_nanos: u64::from_le_bytes(timestamp),
            payload: data.slice(HEADER_SIZE..),
        })
    }

    /// The total wire size of this frame (header + payload).
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }
}

/// Encode a message-data frame, as a server would send it.
pub fn encode_frame(subscription_id: u32, timestamp_nanos: u64, payload: &[u8], dst: &mut BytesMut) {
    dst.reserve(HEADER_SIZE + payload.len());
    dst.put_u8(MESSAGE_DATA);
    dst.put_u32_le(subscription_id);
    dst.put_u64_le(timestamp_nanos);
    dst.put_slice(payload);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::TIME;

    #[test]
    fn parses_header_fields() {
        let mut buf = BytesMut::new();
        encode_frame(7, 1_744_572_625_770_911_281, b"\x00\x01\x00\x00abc", &mut buf);

        let frame = BinaryFrame::parse(buf.freeze()).unwrap();
        assert_eq!(frame.opcode, MESSAGE_DATA);
        assert_eq!(frame.subscription_id, 7);
        assert_eq!(frame.timestamp_nanos, 1_744_572_625_770_911_281);
        assert_eq!(frame.payload.as_ref(), b"\x00\x01\x00\x00abc");
        assert_eq!(frame.wire_size(), HEADER_SIZE + 7);
    }

    #[test]
    fn header_only_frame_has_empty_payload() {
        let mut buf = BytesMut::new();
        encode_frame(1, 0, b"", &mut buf);
        assert_eq!(buf.len(), HEADER_SIZE);

        let frame = BinaryFrame::parse(buf.freeze()).unwrap();
        assert!(frame.payload.is_empty());
    }

    #[test]
    fn twelve_bytes_is_too_short() {
        let data = Bytes::from(vec![MESSAGE_DATA; 12]);
        assert_eq!(
            BinaryFrame::parse(data),
            Err(FrameError::TooShort { len: 12 })
        );
    }

    #[test]
    fn empty_message_is_too_short() {
        assert_eq!(
            BinaryFrame::parse(Bytes::new()),
            Err(FrameError::TooShort { len: 0 })
        );
    }

    #[test]
    fn unsupported_opcode_is_rejected() {
        let mut data = vec![0u8; 20];
        data[0] = TIME;
        assert_eq!(
            BinaryFrame::parse(Bytes::from(data)),
            Err(FrameError::UnsupportedOpcode(TIME))
        );
    }

    #[test]
    fn length_check_precedes_opcode_check() {
        let data = Bytes::from_static(&[0x02, 0x00, 0x00]);
        assert!(matches!(
            BinaryFrame::parse(data),
            Err(FrameError::TooShort { .. })
        ));
    }

    #[test]
    fn subscription_id_is_little_endian() {
        let mut data = vec![MESSAGE_DATA, 0x78, 0x56, 0x34, 0x12];
        data.extend_from_slice(&[0u8; 8]);
        let frame = BinaryFrame::parse(Bytes::from(data)).unwrap();
        assert_eq!(frame.subscription_id, 0x1234_5678);
    }
}
