use serde::Serialize;

use crate::error::Result;
use crate::reader::CdrReader;

/// `builtin_interfaces/Time`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Time {
    pub sec: i32,
    pub nanosec: u32,
}

/// `std_msgs/Header`: stamp followed by the frame id string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Header {
    pub stamp: Time,
    pub frame_id: String,
}

impl Header {
    /// Read a header at the cursor.
    ///
    /// No padding follows `frame_id`; the next field aligns itself. A
    /// `NavSatFix` status octet sits directly after the string's NUL.
    pub fn read(reader: &mut CdrReader<'_>) -> Result<Self> {
        let sec = reader.read_i32()?;
        let nanosec = reader.read_u32()?;
        let frame_id = reader.read_string()?;
        Ok(Self {
            stamp: Time { sec, nanosec },
            frame_id,
        })
    }
}
