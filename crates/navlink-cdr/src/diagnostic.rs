use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::Result;
use crate::header::Header;
use crate::reader::CdrReader;

/// A decoded `diagnostic_msgs/DiagnosticArray`, reduced to `name -> message`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiagnosticMap {
    pub header: Header,
    pub statuses: BTreeMap<String, String>,
}

/// Decode a `diagnostic_msgs/DiagnosticArray` payload (encapsulation header included).
///
/// Each status contributes its `name` and `message`. When a name repeats,
/// the later status in payload order wins. Levels, hardware ids, and
/// key/value pairs are consumed to keep the cursor aligned and then dropped.
pub fn decode_diagnostic_map(payload: &[u8]) -> Result<DiagnosticMap> {
    let mut reader = CdrReader::from_encapsulated(payload)?;
    let header = Header::read(&mut reader)?;

    let count = reader.read_u32()?;
    let mut statuses = BTreeMap::new();

    for _ in 0..count {
        let _level = reader.read_u8()?;
        let name = reader.read_aligned_string()?;
        let message = reader.read_aligned_string()?;
        let _hardware_id = reader.read_aligned_string()?;

        let values = reader.read_u32()?;
        for _ in 0..values {
            reader.skip_string()?; // key
            reader.skip_string()?; // value
        }

        statuses.insert(name, message);
    }

    Ok(DiagnosticMap { header, statuses })
}
