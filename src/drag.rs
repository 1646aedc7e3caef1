//! Drag gesture rules: the ending limit, the per-pair validity checks,
//! direction resolution, and the drag action builder.
//!
//! All angles here are in the recentered snapshot space with the neutral
//! pose at 180°. A drag grows the deviation from 180° on one axis while the
//! orthogonal axis stays near neutral.

use crate::config::DragConfig;
use crate::constants::{
    FOREHEAD, LEFT_CHIN, MIN_DRAG_SNAPSHOTS, NOSE_TIP, RIGHT_CHIN, SNAPSHOT_CENTER_DEG,
    UNDER_MOUTH,
};
use crate::events::Event;
use crate::observation::{Action, ActionKind, Feed, Rect, TrackedPosition};
use crate::snapshot::Snapshot;

/// Resolved drag direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragDirection {
    Left,
    Right,
    Up,
    Down,
}

impl DragDirection {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Left => "drag-left",
            Self::Right => "drag-right",
            Self::Up => "drag-up",
            Self::Down => "drag-down",
        }
    }

    #[must_use]
    pub fn event(self) -> Event {
        match self {
            Self::Left => Event::LeftActionDetected,
            Self::Right => Event::RightActionDetected,
            Self::Up => Event::UpActionDetected,
            Self::Down => Event::DownActionDetected,
        }
    }
}

/// Whether the pose deviation is large enough to end a drag.
///
/// Yaw is symmetric; pitch distinguishes the up side (below 180°) from the
/// down side so the two can carry different limits.
#[must_use]
pub fn hit_drag_limit(pitch: f64, yaw: f64, config: &DragConfig) -> bool {
    if (yaw - SNAPSHOT_CENTER_DEG).abs() >= config.ending_limit_yaw {
        return true;
    }
    if pitch <= SNAPSHOT_CENTER_DEG {
        SNAPSHOT_CENTER_DEG - pitch >= config.ending_limit_pitch_up
    } else {
        pitch - SNAPSHOT_CENTER_DEG >= config.ending_limit_pitch_down
    }
}

/// Whether the sample at `to` has regressed toward neutral relative to the
/// sample at `from`, on either axis, by more than the tolerance
#[must_use]
pub fn going_backward(snapshots: &[Snapshot], from: usize, to: usize, backward_limit: f64) -> bool {
    let earlier = &snapshots[from];
    let later = &snapshots[to];
    let deviation = |angle: f64| (angle - SNAPSHOT_CENTER_DEG).abs();
    deviation(earlier.pitch) >= deviation(later.pitch) + backward_limit
        || deviation(earlier.yaw) >= deviation(later.yaw) + backward_limit
}

/// Whether the angular velocity between two samples falls at or below the
/// slow limit
#[must_use]
pub fn too_slow(snapshots: &[Snapshot], from: usize, to: usize, fps: f64, slow_limit: f64) -> bool {
    let earlier = &snapshots[from];
    let later = &snapshots[to];
    let elapsed = from.abs_diff(to) as f64 / fps;
    let angle_distance = ((earlier.pitch - later.pitch).powi(2)
        + (earlier.yaw - later.yaw).powi(2))
    .sqrt();
    angle_distance / elapsed <= slow_limit
}

/// Whether the buffered run qualifies as a drag: long enough, and no
/// consecutive pair regresses or stalls
#[must_use]
pub fn has_valid_drag(snapshots: &[Snapshot], config: &DragConfig, fps: f64) -> bool {
    if snapshots.len() < MIN_DRAG_SNAPSHOTS {
        return false;
    }
    for i in 0..snapshots.len() - 1 {
        if going_backward(snapshots, i, i + 1, config.backward_limit)
            || too_slow(snapshots, i, i + 1, fps, config.slow_limit)
        {
            return false;
        }
    }
    true
}

fn axis_in_range(snapshots: &[Snapshot], axis: fn(&Snapshot) -> f64, limit: f64) -> bool {
    snapshots
        .iter()
        .all(|snapshot| (axis(snapshot) - SNAPSHOT_CENTER_DEG).abs() <= limit)
}

/// Resolve the direction of a finished drag run.
///
/// Directions are tried in a fixed order (left, right, up, down); the first
/// whose ending sample lands in its half-plane and whose orthogonal axis
/// stayed within tolerance for the whole run wins.
#[must_use]
pub fn classify(snapshots: &[Snapshot], config: &DragConfig) -> Option<DragDirection> {
    let last = snapshots.last()?;
    let out_of_range = config.out_of_range_limit;
    let pitch_ok = || axis_in_range(snapshots, |s| s.pitch, out_of_range);
    let yaw_ok = || axis_in_range(snapshots, |s| s.yaw, out_of_range);

    if last.yaw >= SNAPSHOT_CENTER_DEG
        && last.yaw <= 360.0 - config.ending_limit_yaw
        && pitch_ok()
    {
        return Some(DragDirection::Left);
    }
    if last.yaw >= config.ending_limit_yaw && last.yaw <= SNAPSHOT_CENTER_DEG && pitch_ok() {
        return Some(DragDirection::Right);
    }
    if last.pitch >= config.ending_limit_pitch_up && last.pitch <= SNAPSHOT_CENTER_DEG && yaw_ok()
    {
        return Some(DragDirection::Up);
    }
    if last.pitch >= SNAPSHOT_CENTER_DEG
        && last.pitch <= 360.0 - config.ending_limit_pitch_down
        && yaw_ok()
    {
        return Some(DragDirection::Down);
    }
    None
}

/// Build the drag action: a full-frame region plus one waypoint per feed,
/// swept proportionally between the direction's two reference landmarks.
///
/// The waypoints come from the reference mesh, not the moving frames: they
/// describe where the gesture is headed on the neutral face.
#[must_use]
pub fn build_drag_action(
    direction: DragDirection,
    reference: &Snapshot,
    window: &[Snapshot],
    scale: (f64, f64),
) -> Action {
    let mut action = Action::new(
        ActionKind::Drag,
        direction.label(),
        Rect::new(0.0, 0.0, scale.0, scale.1),
    );

    let marks = &reference.landmarks;
    let count = (window.len() + 1) as f64;
    for (k, snapshot) in std::iter::once(reference).chain(window).enumerate() {
        let mut feed = Feed::new(snapshot.timestamp, snapshot.pitch, snapshot.yaw, snapshot.roll);
        let step = k as f64;
        let (x, y) = match direction {
            DragDirection::Left => {
                let delta = (marks[LEFT_CHIN].x - marks[RIGHT_CHIN].x) / count;
                (marks[RIGHT_CHIN].x + delta * step, marks[RIGHT_CHIN].y)
            }
            DragDirection::Right => {
                let delta = (marks[LEFT_CHIN].x - marks[RIGHT_CHIN].x) / count;
                (marks[LEFT_CHIN].x - delta * step, marks[LEFT_CHIN].y)
            }
            DragDirection::Up => {
                let delta = (marks[UNDER_MOUTH].y - marks[NOSE_TIP].y) / count;
                (marks[NOSE_TIP].x, marks[UNDER_MOUTH].y - delta * step)
            }
            DragDirection::Down => {
                let delta = (marks[NOSE_TIP].y - marks[FOREHEAD].y) / count;
                (marks[FOREHEAD].x, marks[FOREHEAD].y + delta * step)
            }
        };
        feed.add_tracked_position(TrackedPosition::new(x * scale.0, y * scale.1, 0.0));
        action.add_feed(feed);
    }
    action
}
