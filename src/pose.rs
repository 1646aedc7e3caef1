//! Pose decoding: converts the perception pipeline's 4×4 head-pose
//! transform into Euler angles and a scalar distance.

use crate::constants::{GIMBAL_LOCK_EPSILON, SNAPSHOT_CENTER_DEG};
use crate::{Error, Result};
use nalgebra::Matrix4;

/// Decoded head pose for one frame.
///
/// Angles are in degrees, normalized to `[0, 360)` with the neutral
/// (frontal) pose at 0°/360°. `distance` grows as the head moves away from
/// the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodedPose {
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
    pub distance: f64,
}

/// Normalize an angle in degrees into `[0, 360)`
#[must_use]
pub fn normalize_degrees(deg: f64) -> f64 {
    ((deg % 360.0) + 360.0) % 360.0
}

/// Shift a decoded angle so the neutral pose sits at 180°.
///
/// Buffered snapshots live in this recentered space; the drag rules measure
/// deviation from 180° and the decoder can never produce angles there, so
/// the two spaces stay unambiguous.
#[must_use]
pub fn recenter_degrees(deg: f64) -> f64 {
    normalize_degrees(deg + SNAPSHOT_CENTER_DEG)
}

/// Decode pitch/yaw/roll/distance from a 4×4 pose transform.
///
/// `pitch = asin(m12)`; away from gimbal lock `yaw = atan2(m02, m22)` and
/// `roll = atan2(m10, m11)`, otherwise `yaw = 0` and `roll = atan2(-m01, m00)`.
#[must_use]
pub fn decode_pose(m: &Matrix4<f64>) -> DecodedPose {
    let pitch_rad = m[(1, 2)].clamp(-1.0, 1.0).asin();
    let (yaw_rad, roll_rad) = if pitch_rad.cos() > GIMBAL_LOCK_EPSILON {
        (m[(0, 2)].atan2(m[(2, 2)]), m[(1, 0)].atan2(m[(1, 1)]))
    } else {
        (0.0, (-m[(0, 1)]).atan2(m[(0, 0)]))
    };

    DecodedPose {
        pitch: normalize_degrees(pitch_rad.to_degrees()),
        yaw: normalize_degrees(yaw_rad.to_degrees()),
        roll: normalize_degrees(roll_rad.to_degrees()),
        distance: -m[(3, 2)],
    }
}

/// Decode from the wire form: 16 packed floats, row-major.
///
/// # Errors
///
/// Returns `Error::InvalidInput` if the slice is not exactly 16 elements.
pub fn decode_packed(data: &[f64]) -> Result<DecodedPose> {
    if data.len() != 16 {
        return Err(Error::InvalidInput(format!(
            "pose transform needs 16 elements, got {}",
            data.len()
        )));
    }
    Ok(decode_pose(&Matrix4::from_row_slice(data)))
}
