//! Landmark point type and the distance helpers the feature extractors
//! are built from.

use crate::constants::NUM_FACE_LANDMARKS;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A single facial landmark in the perception pipeline's coordinate space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Landmark {
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Euclidean distance between two landmarks, in the x/y plane.
///
/// The z coordinate carries depth relative to the face center and is
/// deliberately excluded: every aspect ratio is defined over image-plane
/// distances.
#[must_use]
pub fn euclidean_distance(from: Landmark, to: Landmark) -> f64 {
    ((from.x - to.x).powi(2) + (from.y - to.y).powi(2)).sqrt()
}

/// Validate that a frame carries the full fixed-topology landmark list
///
/// # Errors
///
/// Returns `Error::MissingLandmarks` when the list is absent or truncated.
pub fn require_full_mesh(landmarks: &[Landmark]) -> Result<()> {
    if landmarks.len() < NUM_FACE_LANDMARKS {
        return Err(Error::MissingLandmarks {
            expected: NUM_FACE_LANDMARKS,
            got: landmarks.len(),
        });
    }
    Ok(())
}
