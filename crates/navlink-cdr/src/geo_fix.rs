use serde::Serialize;

use crate::error::Result;
use crate::header::Header;
use crate::reader::CdrReader;

/// Geographic position in degrees (latitude/longitude) and metres (altitude).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

/// A decoded `sensor_msgs/NavSatFix`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoFix {
    pub header: Header,
    /// `NavSatStatus.status` (-1 no fix, 0 fix, 1 SBAS, 2 GBAS).
    pub status: i8,
    /// `NavSatStatus.service` bit mask.
    pub service: u16,
    pub position: GeoPoint,
    pub position_covariance: [f64; 9],
    pub position_covariance_type: u8,
}

/// Decode a `sensor_msgs/NavSatFix` payload (encapsulation header included).
pub fn decode_geo_fix(payload: &[u8]) -> Result<GeoFix> {
    let mut reader = CdrReader::from_encapsulated(payload)?;
    let header = Header::read(&mut reader)?;

    let status = reader.read_i8()?;
    let service = reader.read_u16()?;
    let [latitude, longitude, altitude] = reader.read_f64_array::<3>()?;
    let position_covariance = reader.read_f64_array::<9>()?;
    let position_covariance_type = reader.read_u8()?;

    Ok(GeoFix {
        header,
        status,
        service,
        position: GeoPoint {
            latitude,
            longitude,
            altitude,
        },
        position_covariance,
        position_covariance_type,
    })
}
