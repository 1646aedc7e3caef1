//! Integration tests driving full gesture tracking sessions

use face_gestures::config::{Config, Profile};
use face_gestures::events::{CollectingObserver, Event, Hint};
use face_gestures::landmark::Landmark;
use face_gestures::observation::FaceObservation;
use face_gestures::tracker::{FrameInput, GestureTracker, SharedTracker};

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 480.0;

/// Row-major pose transform decoding to the given angles and distance
fn transform_for(pitch_deg: f64, yaw_deg: f64, distance: f64) -> [f64; 16] {
    let mut m = [0.0; 16];
    m[0] = 1.0;
    m[6] = pitch_deg.to_radians().sin();
    m[2] = yaw_deg.to_radians().sin();
    m[10] = yaw_deg.to_radians().cos();
    m[4] = 0.0;
    m[5] = 1.0;
    m[14] = -distance;
    m[15] = 1.0;
    m
}

/// Face mesh centered in a 640x480 frame, eyes open or closed.
///
/// Eye landmarks give an EAR of 0.5 when open and 0.05 when closed; all
/// other landmarks are at the origin, which keeps the mouth ratios NaN and
/// the mouth detectors quiet.
fn face_mesh(eyes_open: bool) -> Vec<Landmark> {
    let mut landmarks = vec![Landmark::default(); 468];
    landmarks[4] = Landmark::new(0.5, 0.55, 0.0); // nose tip in the centering window

    let gap = if eyes_open { 0.05 } else { 0.005 };
    let eyes = [
        // (vert1 up, vert1 down, vert2 up, vert2 down, horz right, horz left, base x)
        (385, 380, 386, 374, 362, 263, 0.30),
        (159, 145, 158, 153, 33, 133, 0.60),
    ];
    for &(v1u, v1d, v2u, v2d, hr, hl, base) in &eyes {
        landmarks[v1u] = Landmark::new(base, 0.40, 0.0);
        landmarks[v1d] = Landmark::new(base, 0.40 + gap, 0.0);
        landmarks[v2u] = Landmark::new(base + 0.02, 0.40, 0.0);
        landmarks[v2d] = Landmark::new(base + 0.02, 0.40 + gap, 0.0);
        landmarks[hr] = Landmark::new(base - 0.02, 0.41, 0.0);
        landmarks[hl] = Landmark::new(base + 0.08, 0.41, 0.0);
    }
    landmarks
}

fn feed(
    tracker: &SharedTracker<CollectingObserver>,
    landmarks: &[Landmark],
    pitch: f64,
    yaw: f64,
    distance: f64,
    hint: Option<Hint>,
) {
    let transform = transform_for(pitch, yaw, distance);
    let frame = FrameInput {
        landmarks: Some(landmarks),
        pose_transform: Some(&transform),
        width: WIDTH,
        height: HEIGHT,
        hint,
    };
    tracker.feed(&frame).expect("feed failed");
}

fn session() -> SharedTracker<CollectingObserver> {
    let tracker =
        GestureTracker::with_observer(Config::for_profile(Profile::Mobile), CollectingObserver::new())
            .expect("valid config");
    SharedTracker::new(tracker)
}

fn capture_reference(tracker: &SharedTracker<CollectingObserver>, landmarks: &[Landmark]) {
    feed(tracker, landmarks, 0.0, 0.0, 35.0, None); // init -> start
    feed(tracker, landmarks, 0.0, 0.0, 35.0, None); // start -> ready
    assert_eq!(tracker.current_state(), "ready");
}

#[test]
fn test_drag_session_end_to_end() {
    let tracker = session();
    let mesh = face_mesh(true);
    capture_reference(&tracker, &mesh);

    // Five moving frames pass the debounce, then the yaw run crosses the
    // ending limit.
    for yaw in [6.0, 7.0, 8.0, 9.0, 10.0] {
        feed(&tracker, &mesh, 0.0, yaw, 35.0, None);
    }
    assert_eq!(tracker.current_state(), "drag-tracking");
    for yaw in [13.0, 16.0, 19.0, 22.0] {
        feed(&tracker, &mesh, 0.0, yaw, 35.0, None);
    }
    assert_eq!(tracker.current_state(), "nop");

    // Returning to neutral recovers the ready state.
    feed(&tracker, &mesh, 0.0, 0.0, 35.0, None);
    assert_eq!(tracker.current_state(), "ready");

    let events = tracker.with(|t| t.observer().events.clone());
    assert_eq!(
        events,
        vec![Event::ReferenceDetected, Event::LeftActionDetected]
    );

    // The serialized document carries the drag action with its feeds.
    let json = tracker.observation_json().expect("serializable");
    let parsed = FaceObservation::from_json(&json).expect("parsable");
    assert_eq!(parsed.objects.len(), 1);
    assert_eq!(parsed.objects[0].name, "face");
    assert_eq!(parsed.objects[0].actions.len(), 1);
    let action = &parsed.objects[0].actions[0];
    // Reference plus the five buffered samples.
    assert_eq!(action.feeds.len(), 6);
    for feed in &action.feeds {
        assert_eq!(feed.tracked_positions.len(), 1);
    }
}

#[test]
fn test_blink_detected_after_still_window() {
    let tracker = session();
    let open = face_mesh(true);
    let closed = face_mesh(false);
    capture_reference(&tracker, &open);

    // Hold still for the whole window; eyes close near the end.
    for _ in 0..80 {
        feed(&tracker, &open, 0.0, 0.0, 35.0, None);
    }
    for _ in 0..10 {
        feed(&tracker, &closed, 0.0, 0.0, 35.0, None);
    }
    assert_eq!(tracker.current_state(), "ready");

    let events = tracker.with(|t| t.observer().events.clone());
    assert!(events.contains(&Event::BlinkActionDetected));

    // A blink lands as two push actions, one per eye.
    let json = tracker.observation_json().expect("serializable");
    let parsed = FaceObservation::from_json(&json).expect("parsable");
    assert_eq!(parsed.objects[0].actions.len(), 2);

    let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
    let action = &value["objects"][0]["actions"][0];
    assert_eq!(action["type"], "push");
    assert!(action["roi"].get("Height").is_some());
    assert!(action["feeds"][0]["tracked_position"].is_array());
}

#[test]
fn test_hint_limits_detection_to_requested_kind() {
    let tracker = session();
    let open = face_mesh(true);
    let closed = face_mesh(false);
    capture_reference(&tracker, &open);

    // Force the angry check; the blink in the buffer must be ignored.
    feed(&tracker, &open, 0.0, 0.0, 35.0, Some(Hint::DetectAngry));
    assert_eq!(tracker.current_state(), "checking-angry");
    for _ in 0..78 {
        feed(&tracker, &open, 0.0, 0.0, 35.0, None);
    }
    for _ in 0..11 {
        feed(&tracker, &closed, 0.0, 0.0, 35.0, None);
    }
    assert_eq!(tracker.current_state(), "ready");

    let events = tracker.with(|t| t.observer().events.clone());
    assert!(!events.contains(&Event::BlinkActionDetected));
    assert!(!events.contains(&Event::AngryActionDetected));
}

#[test]
fn test_reset_isolates_sessions() {
    let tracker = session();
    let mesh = face_mesh(true);
    capture_reference(&tracker, &mesh);
    for yaw in [6.0, 7.0, 8.0, 9.0, 10.0, 13.0, 16.0, 19.0, 22.0] {
        feed(&tracker, &mesh, 0.0, yaw, 35.0, None);
    }
    let first_json = tracker.observation_json().expect("serializable");
    let first = FaceObservation::from_json(&first_json).expect("parsable");
    assert_eq!(first.objects[0].actions.len(), 1);

    tracker.reset();
    assert_eq!(tracker.current_state(), "init");

    // A fresh session starts from an empty tree and re-captures a reference.
    let second_json = tracker.observation_json().expect("serializable");
    let second = FaceObservation::from_json(&second_json).expect("parsable");
    assert!(second.objects.is_empty());

    capture_reference(&tracker, &mesh);
    let events = tracker.with(|t| t.observer().events.clone());
    // Two reference events total: one per session.
    assert_eq!(
        events
            .iter()
            .filter(|e| **e == Event::ReferenceDetected)
            .count(),
        2
    );
}

#[test]
fn test_no_face_frames_do_not_break_a_session() {
    let tracker = session();
    let mesh = face_mesh(true);
    capture_reference(&tracker, &mesh);

    let empty = FrameInput {
        landmarks: None,
        pose_transform: None,
        width: WIDTH,
        height: HEIGHT,
        hint: None,
    };
    for _ in 0..3 {
        tracker.feed(&empty).expect("feed failed");
    }
    assert_eq!(tracker.current_state(), "ready");

    // Tracking still works after the gap.
    for yaw in [6.0, 7.0, 8.0, 9.0, 10.0, 13.0, 16.0, 19.0, 22.0] {
        feed(&tracker, &mesh, 0.0, yaw, 35.0, None);
    }
    let events = tracker.with(|t| t.observer().events.clone());
    assert!(events.contains(&Event::LeftActionDetected));
}
