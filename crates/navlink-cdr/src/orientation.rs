use serde::Serialize;

use crate::error::Result;
use crate::header::Header;
use crate::reader::CdrReader;

/// Orientation quaternion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

/// The surfaced part of a `sensor_msgs/Imu` message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Orientation {
    pub header: Header,
    pub quaternion: Quaternion,
}

/// Decode a `sensor_msgs/Imu` payload (encapsulation header included).
///
/// Covariances, angular velocity, and linear acceleration are read so a
/// truncated payload is rejected, then dropped.
pub fn decode_orientation(payload: &[u8]) -> Result<Orientation> {
    let mut reader = CdrReader::from_encapsulated(payload)?;
    let header = Header::read(&mut reader)?;

    let [x, y, z, w] = reader.read_f64_array::<4>()?;
    let _orientation_covariance = reader.read_f64_array::<9>()?;
    let _angular_velocity = reader.read_f64_array::<3>()?;
    let _angular_velocity_covariance = reader.read_f64_array::<9>()?;
    let _linear_acceleration = reader.read_f64_array::<3>()?;
    let _linear_acceleration_covariance = reader.read_f64_array::<9>()?;

    Ok(Orientation {
        header,
        quaternion: Quaternion { x, y, z, w },
    })
}
