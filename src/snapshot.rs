//! Per-frame observation snapshot buffered by the state machine.

use crate::landmark::Landmark;

/// One accepted frame: recentered pose angles plus the full landmark list.
///
/// Immutable once pushed into a buffer; buffers are owned exclusively by the
/// state machine and cleared wholesale on state transitions. Angles are in
/// the recentered space (neutral pose at 180°).
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub timestamp: f64,
    pub frame_index: u64,
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
    pub landmarks: Vec<Landmark>,
}

impl Snapshot {
    #[must_use]
    pub fn new(
        timestamp: f64,
        frame_index: u64,
        pitch: f64,
        yaw: f64,
        roll: f64,
        landmarks: Vec<Landmark>,
    ) -> Self {
        Self {
            timestamp,
            frame_index,
            pitch,
            yaw,
            roll,
            landmarks,
        }
    }
}
