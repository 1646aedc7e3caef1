//! Facial gesture detection from streamed face-mesh landmarks.
//!
//! This library consumes per-frame perception output (468 facial landmarks
//! plus a 4x4 head-pose transform) and turns it into discrete gesture
//! events:
//! - directional head drags (left, right, up, down)
//! - blinks, detected through the eye aspect ratio
//! - angry and happy mouth expressions, detected through two mouth aspect
//!   ratios
//!
//! Detection is driven by a per-session state machine that first captures a
//! neutral reference frame, then alternates between hold-still observation
//! (expression detection) and movement tracking (drag detection). Every
//! detected action is appended to a serializable observation tree that
//! anchors it to the geometry which triggered it.
//!
//! # Examples
//!
//! ## Feeding frames
//!
//! ```
//! use face_gestures::config::Config;
//! use face_gestures::landmark::Landmark;
//! use face_gestures::tracker::{FrameInput, GestureTracker};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut tracker = GestureTracker::new(Config::default())?;
//!
//! // One frame of perception output: a neutral, centered face.
//! let landmarks = vec![Landmark::new(0.5, 0.55, 0.0); 468];
//! let mut transform = [0.0_f64; 16];
//! transform[0] = 1.0;
//! transform[5] = 1.0;
//! transform[10] = 1.0;
//! transform[14] = -35.0;
//! transform[15] = 1.0;
//!
//! let frame = FrameInput {
//!     landmarks: Some(&landmarks),
//!     pose_transform: Some(&transform),
//!     width: 640.0,
//!     height: 480.0,
//!     hint: None,
//! };
//! tracker.feed(&frame)?;
//! assert_eq!(tracker.current_state(), "start");
//! # Ok(())
//! # }
//! ```
//!
//! ## Observing events
//!
//! ```
//! use face_gestures::config::Config;
//! use face_gestures::events::CollectingObserver;
//! use face_gestures::tracker::GestureTracker;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let tracker = GestureTracker::with_observer(Config::default(), CollectingObserver::new())?;
//! assert!(tracker.observer().events.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! ## Sharing a session across threads
//!
//! ```
//! use face_gestures::config::Config;
//! use face_gestures::tracker::{GestureTracker, SharedTracker};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let shared = SharedTracker::new(GestureTracker::new(Config::default())?);
//! let reader = shared.clone();
//! let handle = std::thread::spawn(move || reader.current_state());
//! assert_eq!(handle.join().unwrap(), "init");
//! let json = shared.observation_json()?;
//! assert!(json.contains("objects"));
//! # Ok(())
//! # }
//! ```

/// Landmark point type and distance helpers
pub mod landmark;

/// Head-pose transform decoding into Euler angles and distance
pub mod pose;

/// Reference / hold-still pose bands, distance buckets and frame centering
pub mod reference;

/// Eye aspect ratio and the blink detector
pub mod eyes;

/// Mouth aspect ratios and the angry / happy detectors
pub mod mouth;

/// Drag validity rules, direction resolution and drag action construction
pub mod drag;

/// The serializable observation tree
pub mod observation;

/// Buffered per-frame snapshot
pub mod snapshot;

/// Event, warning and status enums plus the observer seam
pub mod events;

/// The per-session gesture state machine and shared handle
pub mod tracker;

/// Landmark indices and default thresholds
pub mod constants;

/// Configuration management
pub mod config;

/// Error types and result handling
pub mod error;

pub use error::{Error, Result};
