//! Pose classification: reference and hold-still bands, distance buckets,
//! and the frame-centering check.
//!
//! Raw decoded angles sit in `[0, 360)` with the frontal pose at 0°/360°, so
//! every band test has to handle the wraparound: a band of ±3° accepts
//! `[357, 360) ∪ [0, 3]`.

use crate::config::PoseConfig;
use crate::constants::NOSE_ANCHOR;
use crate::events::DistanceStatus;
use crate::landmark::Landmark;
use crate::pose::DecodedPose;
use crate::{Error, Result};

/// True iff `angle` lies within `half_width` degrees of 0°/360°
fn in_frontal_band(angle: f64, half_width: f64) -> bool {
    angle >= 360.0 - half_width || angle <= half_width
}

/// True iff the pose qualifies as the session's reference frame
#[must_use]
pub fn is_reference_frame(pose: &DecodedPose, config: &PoseConfig) -> bool {
    in_frontal_band(pose.pitch, config.reference_range)
        && in_frontal_band(pose.yaw, config.reference_range)
        && in_frontal_band(pose.roll, config.reference_range)
}

/// True iff the subject counts as stationary (the wider band)
#[must_use]
pub fn is_within_hold_still_range(pose: &DecodedPose, config: &PoseConfig) -> bool {
    in_frontal_band(pose.pitch, config.hold_still_range)
        && in_frontal_band(pose.yaw, config.hold_still_range)
        && in_frontal_band(pose.roll, config.hold_still_range)
}

/// Bucket the face distance against the configured limits
#[must_use]
pub fn distance_status(distance: f64, config: &PoseConfig) -> DistanceStatus {
    if distance > config.max_distance {
        DistanceStatus::TooFar
    } else if distance < config.min_distance {
        DistanceStatus::TooClose
    } else {
        DistanceStatus::GoodDistance
    }
}

/// Nose tip position in pixel coordinates.
///
/// The landmark feed is normalized; centering always evaluates in pixel
/// units, so the anchor is scaled by the frame dimensions here regardless of
/// the configured output coordinate space.
///
/// # Errors
///
/// Returns `InvalidLandmarkIndex` if the landmark list is truncated.
pub fn anchor_point(width: f64, height: f64, landmarks: &[Landmark]) -> Result<(f64, f64)> {
    let nose = landmarks
        .get(NOSE_ANCHOR)
        .copied()
        .ok_or(Error::InvalidLandmarkIndex(NOSE_ANCHOR))?;
    Ok((nose.x * width, nose.y * height))
}

/// Check that the nose tip sits inside the tolerance window around the
/// center of the centered square (letterbox) region of the frame.
///
/// The window is asymmetric: ±`center_range` horizontally, but
/// `[cy, cy + 2 * center_range]` vertically, which biases toward a face
/// placed slightly below center.
///
/// # Errors
///
/// Returns `InvalidLandmarkIndex` if the landmark list is truncated.
pub fn within_frame(
    width: f64,
    height: f64,
    landmarks: &[Landmark],
    config: &PoseConfig,
) -> Result<bool> {
    let side = width.min(height);
    let left_x = (width - side) * 0.5;
    let left_y = (height - side) * 0.5;
    let center_x = left_x + side * 0.5;
    let center_y = left_y + side * 0.5;

    let (nose_x, nose_y) = anchor_point(width, height, landmarks)?;
    let tolerance = config.center_range;

    Ok(nose_x >= center_x - tolerance
        && nose_x <= center_x + tolerance
        && nose_y >= center_y
        && nose_y <= center_y + 2.0 * tolerance)
}
