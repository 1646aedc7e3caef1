//! Mouth geometry: the two aspect ratios behind the angry and happy
//! expressions, their detectors, and the action builders.
//!
//! Both ratios are built from the same lip edge samples, taken at three
//! horizontal positions and averaged. MHAR (mouth height aspect ratio)
//! compares the inner mouth gap to the upper lip thickness and spikes when
//! the mouth opens wide. MWAR2 (mouth width aspect ratio) compares the
//! corner-to-corner width to the outer mouth height and spikes on a wide,
//! closed-lipped smile.

use crate::config::ExpressionConfig;
use crate::constants::{
    ANGRY_BOX_LEFT, ANGRY_BOX_LOWER, ANGRY_BOX_RIGHT, ANGRY_BOX_UPPER, ANGRY_TRACK_LOWER_END,
    ANGRY_TRACK_LOWER_START, ANGRY_TRACK_UPPER_END, ANGRY_TRACK_UPPER_START, HAPPY_BOX_LEFT,
    HAPPY_BOX_LOWER, HAPPY_BOX_RIGHT, HAPPY_TRACK_LEFT_END, HAPPY_TRACK_LEFT_START,
    HAPPY_TRACK_RIGHT_END, HAPPY_TRACK_RIGHT_START, LOWER_LIP_LOWER, LOWER_LIP_UPPER,
    MOUTH_LEFT_CORNER, MOUTH_RIGHT_CORNER, UPPER_LIP_LOWER, UPPER_LIP_UPPER,
};
use crate::landmark::{euclidean_distance, Landmark};
use crate::observation::{Action, ActionKind, Feed, Rect, TrackedPosition};
use crate::snapshot::Snapshot;

fn mean_edge_distance(landmarks: &[Landmark], upper: [usize; 3], lower: [usize; 3]) -> f64 {
    upper
        .iter()
        .zip(lower.iter())
        .map(|(&u, &l)| euclidean_distance(landmarks[u], landmarks[l]))
        .sum::<f64>()
        / 3.0
}

/// Mouth height aspect ratio: inner mouth gap over upper lip thickness.
///
/// # Panics
///
/// Panics if the landmark list is shorter than the full mesh.
#[must_use]
pub fn mouth_height_aspect_ratio(landmarks: &[Landmark]) -> f64 {
    let lip_height = mean_edge_distance(landmarks, UPPER_LIP_UPPER, UPPER_LIP_LOWER);
    let mouth_height = mean_edge_distance(landmarks, UPPER_LIP_LOWER, LOWER_LIP_UPPER);
    mouth_height / lip_height
}

/// Mouth width aspect ratio: corner-to-corner width over outer mouth height.
///
/// # Panics
///
/// Panics if the landmark list is shorter than the full mesh.
#[must_use]
pub fn mouth_width_aspect_ratio(landmarks: &[Landmark]) -> f64 {
    let mouth_height = mean_edge_distance(landmarks, UPPER_LIP_UPPER, LOWER_LIP_LOWER);
    let mouth_width =
        euclidean_distance(landmarks[MOUTH_RIGHT_CORNER], landmarks[MOUTH_LEFT_CORNER]);
    mouth_width / mouth_height
}

/// Whether the mouth reads as the angry expression on this frame
#[must_use]
pub fn is_angry_mouth(landmarks: &[Landmark], threshold: f64) -> bool {
    mouth_height_aspect_ratio(landmarks) >= threshold
}

/// Whether the mouth reads as the happy expression on this frame
#[must_use]
pub fn is_happy_mouth(landmarks: &[Landmark], threshold: f64) -> bool {
    mouth_width_aspect_ratio(landmarks) >= threshold
}

fn find_expression<F: Fn(&[Landmark]) -> bool>(
    snapshots: &[Snapshot],
    lookback: usize,
    hit: F,
) -> Option<(usize, usize)> {
    for (i, snapshot) in snapshots.iter().enumerate() {
        if hit(&snapshot.landmarks) && i > lookback {
            return Some((i - lookback, i));
        }
    }
    None
}

/// Scan buffered snapshots for the angry expression; returns the slice of
/// samples leading up to and including the trigger
#[must_use]
pub fn find_angry(snapshots: &[Snapshot], config: &ExpressionConfig) -> Option<(usize, usize)> {
    find_expression(snapshots, config.lookback, |landmarks| {
        is_angry_mouth(landmarks, config.mhar_threshold)
    })
}

/// Scan buffered snapshots for the happy expression; returns the slice of
/// samples leading up to and including the trigger
#[must_use]
pub fn find_happy(snapshots: &[Snapshot], config: &ExpressionConfig) -> Option<(usize, usize)> {
    find_expression(snapshots, config.lookback, |landmarks| {
        is_happy_mouth(landmarks, config.mwar2_threshold)
    })
}

struct TrackPair {
    start: [usize; 2],
    end: [usize; 2],
}

/// Shared builder for the two spread actions: a region from the reference
/// mesh plus a pair of tracked points swept from their start landmarks to
/// their end landmarks across the window, interpolated in between.
fn build_spread_action(
    label: &str,
    roi: Rect,
    track: &TrackPair,
    reference: &Snapshot,
    window: &[Snapshot],
    scale: (f64, f64),
) -> Action {
    let mut action = Action::new(
        ActionKind::Spread,
        label,
        Rect::new(
            roi.x * scale.0,
            roi.y * scale.1,
            roi.width * scale.0,
            roi.height * scale.1,
        ),
    );

    let point = |index: usize| {
        let landmark = reference.landmarks[index];
        (landmark.x, landmark.y)
    };
    let starts = [point(track.start[0]), point(track.start[1])];
    let ends = [point(track.end[0]), point(track.end[1])];

    let count = window.len() + 1;
    for (k, snapshot) in std::iter::once(reference).chain(window).enumerate() {
        let mut feed = Feed::new(snapshot.timestamp, snapshot.pitch, snapshot.yaw, snapshot.roll);
        let t = if count > 1 {
            k as f64 / (count - 1) as f64
        } else {
            0.0
        };
        for (start, end) in starts.iter().zip(ends.iter()) {
            let x = start.0 + (end.0 - start.0) * t;
            let y = start.1 + (end.1 - start.1) * t;
            feed.add_tracked_position(TrackedPosition::new(x * scale.0, y * scale.1, 0.0));
        }
        action.add_feed(feed);
    }
    action
}

/// Build the spread action for a detected angry expression
#[must_use]
pub fn build_angry_action(reference: &Snapshot, window: &[Snapshot], scale: (f64, f64)) -> Action {
    let marks = &reference.landmarks;
    let roi = Rect::new(
        marks[ANGRY_BOX_RIGHT].x,
        marks[ANGRY_BOX_UPPER].y,
        marks[ANGRY_BOX_LEFT].x - marks[ANGRY_BOX_RIGHT].x,
        marks[ANGRY_BOX_LOWER].y - marks[ANGRY_BOX_UPPER].y,
    );
    build_spread_action(
        "angry",
        roi,
        &TrackPair {
            start: [ANGRY_TRACK_UPPER_START, ANGRY_TRACK_LOWER_START],
            end: [ANGRY_TRACK_UPPER_END, ANGRY_TRACK_LOWER_END],
        },
        reference,
        window,
        scale,
    )
}

/// Build the spread action for a detected happy expression.
///
/// The region origin takes both coordinates from the right-edge landmark,
/// preserved from the serialized format this feeds.
#[must_use]
pub fn build_happy_action(reference: &Snapshot, window: &[Snapshot], scale: (f64, f64)) -> Action {
    let marks = &reference.landmarks;
    let roi = Rect::new(
        marks[HAPPY_BOX_RIGHT].x,
        marks[HAPPY_BOX_RIGHT].y,
        marks[HAPPY_BOX_LEFT].x - marks[HAPPY_BOX_RIGHT].x,
        marks[HAPPY_BOX_LOWER].y - marks[HAPPY_BOX_RIGHT].y,
    );
    build_spread_action(
        "happy",
        roi,
        &TrackPair {
            start: [HAPPY_TRACK_RIGHT_START, HAPPY_TRACK_LEFT_START],
            end: [HAPPY_TRACK_RIGHT_END, HAPPY_TRACK_LEFT_END],
        },
        reference,
        window,
        scale,
    )
}
