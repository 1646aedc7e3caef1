//! Closed event, warning and status enumerations, and the observer seam the
//! state machine reports through.
//!
//! These are deliberately tagged variants rather than trait objects per
//! kind: the sets are fixed and exhaustive matching is part of the contract.

use serde::{Deserialize, Serialize};

/// Gesture events emitted by the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    ReferenceDetected,
    LeftActionDetected,
    RightActionDetected,
    UpActionDetected,
    DownActionDetected,
    BlinkActionDetected,
    AngryActionDetected,
    HappyActionDetected,
}

/// Non-fatal conditions surfaced during frame processing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Warning {
    GoingBackward,
    TooSlow,
    InvalidDragAction,
    NoFace,
    Timeout,
}

/// Distance bucket of the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceStatus {
    TooFar,
    TooClose,
    GoodDistance,
}

/// External request to force a checking sub-state.
///
/// Serialized in kebab-case ("detect-blink") in frame capture files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Hint {
    DetectBlink,
    DetectAngry,
    DetectHappy,
    DetectDrag,
}

/// Per-frame status tuple for UI feedback
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalStatus {
    pub distance: DistanceStatus,
    /// Whether the raw pose sits inside the hold-still band
    pub holding_still: bool,
    pub within_frame: bool,
    /// Nose tip position in pixel coordinates
    pub anchor: (f64, f64),
}

/// Observer seam for everything the state machine reports.
///
/// All callbacks run synchronously inside the frame feed; implementations
/// should return quickly. Default implementations ignore everything, so an
/// observer only overrides what it cares about.
pub trait GestureObserver: Send {
    fn on_event(&mut self, _event: Event) {}
    fn on_warning(&mut self, _warning: Warning) {}
    fn on_signal(&mut self, _signal: SignalStatus) {}
    fn on_geometry(&mut self, _pitch: f64, _yaw: f64, _roll: f64, _distance: f64) {}
}

/// Observer that discards everything
pub struct NullObserver;

impl GestureObserver for NullObserver {}

/// Observer that records events and warnings, for tests and batch drivers
#[derive(Default)]
pub struct CollectingObserver {
    pub events: Vec<Event>,
    pub warnings: Vec<Warning>,
}

impl CollectingObserver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether all four drag directions plus blink, angry and happy were seen
    #[must_use]
    pub fn all_gestures_captured(&self) -> bool {
        use Event::{
            AngryActionDetected, BlinkActionDetected, DownActionDetected, HappyActionDetected,
            LeftActionDetected, RightActionDetected, UpActionDetected,
        };
        [
            LeftActionDetected,
            RightActionDetected,
            UpActionDetected,
            DownActionDetected,
            BlinkActionDetected,
            AngryActionDetected,
            HappyActionDetected,
        ]
        .iter()
        .all(|event| self.events.contains(event))
    }
}

impl GestureObserver for CollectingObserver {
    fn on_event(&mut self, event: Event) {
        self.events.push(event);
    }

    fn on_warning(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }
}
