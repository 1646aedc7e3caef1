//! Eye geometry: aspect ratio, eye regions, and the blink detector.
//!
//! The eye aspect ratio (EAR) is the mean of two vertical lid gaps over twice
//! the horizontal eye width, so it is scale invariant and drops sharply when
//! the lids close.

use crate::config::ExpressionConfig;
use crate::constants::{
    LEFT_EYE_DOWN_EDGE, LEFT_EYE_HORZ_LEFT, LEFT_EYE_HORZ_RIGHT, LEFT_EYE_LEFT_EDGE,
    LEFT_EYE_RIGHT_EDGE, LEFT_EYE_UP_EDGE, LEFT_EYE_VERT1_DOWN, LEFT_EYE_VERT1_UP,
    LEFT_EYE_VERT2_DOWN, LEFT_EYE_VERT2_UP, RIGHT_EYE_DOWN_EDGE, RIGHT_EYE_HORZ_LEFT,
    RIGHT_EYE_HORZ_RIGHT, RIGHT_EYE_LEFT_EDGE, RIGHT_EYE_RIGHT_EDGE, RIGHT_EYE_UP_EDGE,
    RIGHT_EYE_VERT1_DOWN, RIGHT_EYE_VERT1_UP, RIGHT_EYE_VERT2_DOWN, RIGHT_EYE_VERT2_UP,
};
use crate::landmark::{euclidean_distance, Landmark};
use crate::observation::{Action, ActionKind, Feed, Rect, TrackedPosition};
use crate::snapshot::Snapshot;

fn aspect_ratio(
    landmarks: &[Landmark],
    vert1: (usize, usize),
    vert2: (usize, usize),
    horz: (usize, usize),
) -> f64 {
    let vertical_1 = euclidean_distance(landmarks[vert1.0], landmarks[vert1.1]);
    let vertical_2 = euclidean_distance(landmarks[vert2.0], landmarks[vert2.1]);
    let horizontal = euclidean_distance(landmarks[horz.0], landmarks[horz.1]);
    (vertical_1 + vertical_2) / (2.0 * horizontal)
}

/// Left eye aspect ratio.
///
/// # Panics
///
/// Panics if the landmark list is shorter than the full mesh.
#[must_use]
pub fn left_eye_aspect_ratio(landmarks: &[Landmark]) -> f64 {
    aspect_ratio(
        landmarks,
        (LEFT_EYE_VERT1_UP, LEFT_EYE_VERT1_DOWN),
        (LEFT_EYE_VERT2_UP, LEFT_EYE_VERT2_DOWN),
        (LEFT_EYE_HORZ_RIGHT, LEFT_EYE_HORZ_LEFT),
    )
}

/// Right eye aspect ratio.
///
/// # Panics
///
/// Panics if the landmark list is shorter than the full mesh.
#[must_use]
pub fn right_eye_aspect_ratio(landmarks: &[Landmark]) -> f64 {
    aspect_ratio(
        landmarks,
        (RIGHT_EYE_VERT1_UP, RIGHT_EYE_VERT1_DOWN),
        (RIGHT_EYE_VERT2_UP, RIGHT_EYE_VERT2_DOWN),
        (RIGHT_EYE_HORZ_RIGHT, RIGHT_EYE_HORZ_LEFT),
    )
}

/// Mean aspect ratio over both eyes
#[must_use]
pub fn eye_aspect_ratio(landmarks: &[Landmark]) -> f64 {
    (left_eye_aspect_ratio(landmarks) + right_eye_aspect_ratio(landmarks)) * 0.5
}

/// Whether both eyes read as closed on this frame
#[must_use]
pub fn is_blink(landmarks: &[Landmark], threshold: f64) -> bool {
    eye_aspect_ratio(landmarks) <= threshold
}

#[must_use]
pub fn left_eye_center(landmarks: &[Landmark]) -> (f64, f64) {
    (
        (landmarks[LEFT_EYE_LEFT_EDGE].x + landmarks[LEFT_EYE_RIGHT_EDGE].x) * 0.5,
        (landmarks[LEFT_EYE_DOWN_EDGE].y + landmarks[LEFT_EYE_UP_EDGE].y) * 0.5,
    )
}

#[must_use]
pub fn right_eye_center(landmarks: &[Landmark]) -> (f64, f64) {
    (
        (landmarks[RIGHT_EYE_LEFT_EDGE].x + landmarks[RIGHT_EYE_RIGHT_EDGE].x) * 0.5,
        (landmarks[RIGHT_EYE_DOWN_EDGE].y + landmarks[RIGHT_EYE_UP_EDGE].y) * 0.5,
    )
}

/// Bounding box of the left eye, spanned by its edge landmarks
#[must_use]
pub fn left_eye_roi(landmarks: &[Landmark]) -> Rect {
    let x = landmarks[LEFT_EYE_RIGHT_EDGE].x;
    let y = landmarks[LEFT_EYE_UP_EDGE].y;
    Rect::new(
        x,
        y,
        landmarks[LEFT_EYE_LEFT_EDGE].x - x,
        landmarks[LEFT_EYE_DOWN_EDGE].y - y,
    )
}

/// Bounding box of the right eye, spanned by its edge landmarks
#[must_use]
pub fn right_eye_roi(landmarks: &[Landmark]) -> Rect {
    let x = landmarks[RIGHT_EYE_RIGHT_EDGE].x;
    let y = landmarks[RIGHT_EYE_UP_EDGE].y;
    Rect::new(
        x,
        y,
        landmarks[RIGHT_EYE_LEFT_EDGE].x - x,
        landmarks[RIGHT_EYE_DOWN_EDGE].y - y,
    )
}

/// Scan buffered snapshots for a blink and return the contributing slice.
///
/// The trigger is the first sample whose EAR falls to the threshold with at
/// least `lookback` samples of history before it; the slice covers the
/// `lookback` samples leading up to and including the trigger.
#[must_use]
pub fn find_blink(snapshots: &[Snapshot], config: &ExpressionConfig) -> Option<(usize, usize)> {
    for (i, snapshot) in snapshots.iter().enumerate() {
        if is_blink(&snapshot.landmarks, config.ear_threshold) && i > config.lookback {
            return Some((i - config.lookback, i));
        }
    }
    None
}

/// Build the pair of push actions (left eye, right eye) for a detected blink.
///
/// Regions and tracked centers come from the reference landmarks; the window
/// snapshots contribute the rotation track. `scale` converts normalized
/// geometry into the configured output space.
#[must_use]
pub fn build_blink_actions(
    reference: &Snapshot,
    window: &[Snapshot],
    scale: (f64, f64),
) -> [Action; 2] {
    let scaled = |rect: Rect| {
        Rect::new(
            rect.x * scale.0,
            rect.y * scale.1,
            rect.width * scale.0,
            rect.height * scale.1,
        )
    };
    let mut left_action = Action::new(
        ActionKind::Push,
        "blink-left",
        scaled(left_eye_roi(&reference.landmarks)),
    );
    let mut right_action = Action::new(
        ActionKind::Push,
        "blink-right",
        scaled(right_eye_roi(&reference.landmarks)),
    );

    let left_center = left_eye_center(&reference.landmarks);
    let right_center = right_eye_center(&reference.landmarks);

    for snapshot in std::iter::once(reference).chain(window) {
        let mut left_feed = Feed::new(snapshot.timestamp, snapshot.pitch, snapshot.yaw, snapshot.roll);
        left_feed.add_tracked_position(TrackedPosition::new(
            left_center.0 * scale.0,
            left_center.1 * scale.1,
            0.0,
        ));
        left_action.add_feed(left_feed);

        let mut right_feed =
            Feed::new(snapshot.timestamp, snapshot.pitch, snapshot.yaw, snapshot.roll);
        right_feed.add_tracked_position(TrackedPosition::new(
            right_center.0 * scale.0,
            right_center.1 * scale.1,
            0.0,
        ));
        right_action.add_feed(right_feed);
    }

    [left_action, right_action]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::NUM_FACE_LANDMARKS;

    fn mesh_with(points: &[(usize, f64, f64)]) -> Vec<Landmark> {
        let mut landmarks = vec![Landmark::default(); NUM_FACE_LANDMARKS];
        for &(index, x, y) in points {
            landmarks[index] = Landmark::new(x, y, 0.0);
        }
        landmarks
    }

    fn mesh_with_ear(gap: f64) -> Vec<Landmark> {
        mesh_with(&[
            (LEFT_EYE_VERT1_UP, 0.30, 0.40),
            (LEFT_EYE_VERT1_DOWN, 0.30, 0.40 + gap),
            (LEFT_EYE_VERT2_UP, 0.32, 0.40),
            (LEFT_EYE_VERT2_DOWN, 0.32, 0.40 + gap),
            (LEFT_EYE_HORZ_RIGHT, 0.28, 0.41),
            (LEFT_EYE_HORZ_LEFT, 0.38, 0.41),
            (RIGHT_EYE_VERT1_UP, 0.60, 0.40),
            (RIGHT_EYE_VERT1_DOWN, 0.60, 0.40 + gap),
            (RIGHT_EYE_VERT2_UP, 0.62, 0.40),
            (RIGHT_EYE_VERT2_DOWN, 0.62, 0.40 + gap),
            (RIGHT_EYE_HORZ_RIGHT, 0.58, 0.41),
            (RIGHT_EYE_HORZ_LEFT, 0.68, 0.41),
        ])
    }

    #[test]
    fn test_ear_matches_lid_gap() {
        // Lid gap 0.02 over width 0.10 gives EAR 0.2 for each eye.
        let landmarks = mesh_with_ear(0.02);
        assert!((eye_aspect_ratio(&landmarks) - 0.2).abs() < 1e-12);
        assert!(is_blink(&landmarks, 0.2));
        assert!(!is_blink(&landmarks, 0.16));
    }

    #[test]
    fn test_ear_is_scale_invariant() {
        let landmarks = mesh_with_ear(0.02);
        let doubled: Vec<Landmark> = landmarks
            .iter()
            .map(|p| Landmark::new(p.x * 2.0, p.y * 2.0, p.z))
            .collect();
        assert!((eye_aspect_ratio(&landmarks) - eye_aspect_ratio(&doubled)).abs() < 1e-12);
    }

    #[test]
    fn test_find_blink_needs_history() {
        let config = ExpressionConfig::default();
        let open = mesh_with_ear(0.05);
        let closed = mesh_with_ear(0.005);

        let snapshot = |i: u64, landmarks: &Vec<Landmark>| {
            Snapshot::new(i as f64 / 30.0, i, 180.0, 180.0, 180.0, landmarks.clone())
        };

        // Closed eyes at index 5: not enough history.
        let mut snapshots: Vec<Snapshot> = (0..5).map(|i| snapshot(i, &open)).collect();
        snapshots.push(snapshot(5, &closed));
        assert_eq!(find_blink(&snapshots, &config), None);

        // Closed eyes at index 15: slice covers [5, 15].
        let mut snapshots: Vec<Snapshot> = (0..15).map(|i| snapshot(i, &open)).collect();
        snapshots.push(snapshot(15, &closed));
        assert_eq!(find_blink(&snapshots, &config), Some((5, 15)));
    }

    #[test]
    fn test_blink_actions_share_rotation_track() {
        let open = mesh_with_ear(0.05);
        let reference = Snapshot::new(0.0, 0, 180.0, 180.0, 180.0, open.clone());
        let window: Vec<Snapshot> = (1..4)
            .map(|i| Snapshot::new(i as f64 / 30.0, i, 181.0, 179.0, 180.0, open.clone()))
            .collect();

        let [left, right] = build_blink_actions(&reference, &window, (1.0, 1.0));
        assert_eq!(left.kind, ActionKind::Push);
        assert_eq!(left.feeds.len(), 4);
        assert_eq!(right.feeds.len(), 4);
        // Tracked centers are constant across the feed.
        let first = left.feeds[0].tracked_positions[0];
        for feed in &left.feeds {
            assert_eq!(feed.tracked_positions.len(), 1);
            assert_eq!(feed.tracked_positions[0], first);
        }
        assert!((left.feeds[1].rotation.pitch - 181.0).abs() < 1e-12);
    }

    #[test]
    fn test_pixel_scale_applies_to_roi_and_centers() {
        let open = mesh_with_ear(0.05);
        let reference = Snapshot::new(0.0, 0, 180.0, 180.0, 180.0, open.clone());
        let [left, _] = build_blink_actions(&reference, &[], (640.0, 480.0));
        let normalized_center = left_eye_center(&open);
        let tracked = left.feeds[0].tracked_positions[0];
        assert!((tracked.x - normalized_center.0 * 640.0).abs() < 1e-9);
        assert!((tracked.y - normalized_center.1 * 480.0).abs() < 1e-9);
    }
}
