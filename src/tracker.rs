//! The gesture state machine: per-session owner of all mutable tracking
//! state, and the shared handle for concurrent callers.
//!
//! One producer feeds frames sequentially; everything else (events,
//! warnings, signals) flows out through the observer synchronously. A frame
//! with missing perception data is skipped with a warning, never an error.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, info, warn};

use crate::config::{Config, CoordinateSpace};
use crate::drag::{self, DragDirection};
use crate::events::{
    DistanceStatus, Event, GestureObserver, Hint, NullObserver, SignalStatus, Warning,
};
use crate::eyes;
use crate::landmark::{require_full_mesh, Landmark};
use crate::mouth;
use crate::observation::FaceObservation;
use crate::pose::{decode_packed, recenter_degrees, DecodedPose};
use crate::reference;
use crate::snapshot::Snapshot;
use crate::{Error, Result};

/// One frame of perception output.
///
/// `landmarks` and `pose_transform` are optional: the perception pipeline
/// drops them when no face is found, and the tracker skips such frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput<'a> {
    pub landmarks: Option<&'a [Landmark]>,
    /// 16 packed floats, row-major 4x4
    pub pose_transform: Option<&'a [f64]>,
    pub width: f64,
    pub height: f64,
    pub hint: Option<Hint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Init,
    Start,
    Ready,
    DragTracking,
    CheckingBlink,
    CheckingAngry,
    CheckingHappy,
    Nop,
}

impl State {
    fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Start => "start",
            Self::Ready => "ready",
            Self::DragTracking => "drag-tracking",
            Self::CheckingBlink => "checking-blink",
            Self::CheckingAngry => "checking-angry",
            Self::CheckingHappy => "checking-happy",
            Self::Nop => "nop",
        }
    }

    /// Ready and the hint-forced checking sub-states share the hold-still
    /// buffering flow
    fn is_ready_family(self) -> bool {
        matches!(
            self,
            Self::Ready | Self::CheckingBlink | Self::CheckingAngry | Self::CheckingHappy
        )
    }
}

/// Which expression detectors a filled hold-still buffer is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StillScan {
    All,
    BlinkOnly,
    AngryOnly,
    HappyOnly,
}

/// Per-session gesture tracker.
///
/// Owns the current state, the snapshot buffer, the reference snapshot, the
/// observation tree and the frame counter. Single-threaded by itself; wrap
/// it in a [`SharedTracker`] when another thread needs to query or reset.
pub struct GestureTracker<O: GestureObserver = NullObserver> {
    config: Config,
    observer: O,
    state: State,
    previous_state: State,
    frame_index: u64,
    reference: Option<Snapshot>,
    buffer: Vec<Snapshot>,
    moving_count: usize,
    observation: FaceObservation,
    frames_since_event: u64,
    timeout_warned: bool,
}

impl GestureTracker<NullObserver> {
    /// Create a tracker that discards all callbacks
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the configuration is inconsistent.
    pub fn new(config: Config) -> Result<Self> {
        Self::with_observer(config, NullObserver)
    }
}

impl<O: GestureObserver> GestureTracker<O> {
    /// Create a tracker reporting through the given observer
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the configuration is inconsistent.
    pub fn with_observer(config: Config, observer: O) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            observer,
            state: State::Init,
            previous_state: State::Init,
            frame_index: 0,
            reference: None,
            buffer: Vec::new(),
            moving_count: 0,
            observation: FaceObservation::new(""),
            frames_since_event: 0,
            timeout_warned: false,
        })
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// State name for UI display
    #[must_use]
    pub fn current_state(&self) -> &'static str {
        self.state.as_str()
    }

    /// State name before the most recent transition
    #[must_use]
    pub fn previous_state(&self) -> &'static str {
        self.previous_state.as_str()
    }

    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    #[must_use]
    pub fn observation(&self) -> &FaceObservation {
        &self.observation
    }

    /// Serialized observation document; valid at any point in a session
    ///
    /// # Errors
    ///
    /// Returns a serialization error if JSON encoding fails.
    pub fn observation_json(&self) -> Result<String> {
        self.observation.to_json()
    }

    pub fn set_media_path(&mut self, path: impl Into<String>) {
        self.observation.set_file_path(path);
    }

    /// Clear all session state; the media path and configuration survive
    pub fn reset(&mut self) {
        let file_path = std::mem::take(&mut self.observation.file_path);
        self.state = State::Init;
        self.previous_state = State::Init;
        self.frame_index = 0;
        self.reference = None;
        self.buffer.clear();
        self.moving_count = 0;
        self.observation = FaceObservation::new(file_path);
        self.frames_since_event = 0;
        self.timeout_warned = false;
        info!("tracker reset");
    }

    /// Process one frame of perception output.
    ///
    /// # Errors
    ///
    /// Only internal geometry lookups can fail here; per-frame data gaps are
    /// reported as `NoFace` warnings and skipped.
    pub fn feed(&mut self, frame: &FrameInput<'_>) -> Result<()> {
        let (landmarks, pose) = match self.validate_frame(frame) {
            Ok(input) => input,
            Err(err) => {
                debug!("frame {} skipped: {err}", self.frame_index);
                self.warn_observer(Warning::NoFace);
                self.frame_index += 1;
                self.tick_timeout();
                return Ok(());
            }
        };

        self.observer
            .on_geometry(pose.pitch, pose.yaw, pose.roll, pose.distance);

        let distance = reference::distance_status(pose.distance, &self.config.pose);
        let holding_still = reference::is_within_hold_still_range(&pose, &self.config.pose);
        let in_frame =
            reference::within_frame(frame.width, frame.height, landmarks, &self.config.pose)?;
        let anchor = reference::anchor_point(frame.width, frame.height, landmarks)?;
        self.observer.on_signal(SignalStatus {
            distance,
            holding_still,
            within_frame: in_frame,
            anchor,
        });

        let conditions_good = distance == DistanceStatus::GoodDistance && in_frame;
        let scale = self.output_scale(frame.width, frame.height);
        let snapshot = self.make_snapshot(&pose, landmarks);

        match self.state {
            State::Init => self.transition(State::Start),
            State::Start => {
                if conditions_good && reference::is_reference_frame(&pose, &self.config.pose) {
                    info!(
                        "reference frame captured at frame {} (distance {:.1})",
                        self.frame_index, pose.distance
                    );
                    self.reference = Some(snapshot);
                    self.emit(Event::ReferenceDetected);
                    self.transition(State::Ready);
                }
            }
            state if state.is_ready_family() => {
                self.step_ready_family(frame.hint, conditions_good, holding_still, snapshot, scale);
            }
            State::DragTracking => {
                self.step_drag_tracking(conditions_good, holding_still, snapshot, scale);
            }
            State::Nop => {
                if conditions_good && holding_still {
                    self.buffer.clear();
                    self.transition(State::Ready);
                }
            }
            // is_ready_family covers the remaining variants
            _ => unreachable!("state machine arm not covered"),
        }

        self.frame_index += 1;
        self.tick_timeout();
        Ok(())
    }

    fn validate_frame<'a>(
        &self,
        frame: &FrameInput<'a>,
    ) -> Result<(&'a [Landmark], DecodedPose)> {
        let landmarks = frame.landmarks.ok_or(Error::MissingLandmarks {
            expected: crate::constants::NUM_FACE_LANDMARKS,
            got: 0,
        })?;
        require_full_mesh(landmarks)?;
        let packed = frame
            .pose_transform
            .ok_or(Error::MissingPoseData(self.frame_index))?;
        let pose = decode_packed(packed)?;
        Ok((landmarks, pose))
    }

    fn make_snapshot(&self, pose: &DecodedPose, landmarks: &[Landmark]) -> Snapshot {
        Snapshot::new(
            self.frame_index as f64 / self.config.fps,
            self.frame_index,
            recenter_degrees(pose.pitch),
            recenter_degrees(pose.yaw),
            recenter_degrees(pose.roll),
            landmarks.to_vec(),
        )
    }

    fn output_scale(&self, width: f64, height: f64) -> (f64, f64) {
        match self.config.coordinate_space {
            CoordinateSpace::Normalized => (1.0, 1.0),
            CoordinateSpace::Pixel => (width, height),
        }
    }

    fn step_ready_family(
        &mut self,
        hint: Option<Hint>,
        conditions_good: bool,
        holding_still: bool,
        snapshot: Snapshot,
        scale: (f64, f64),
    ) {
        if !conditions_good {
            self.buffer.clear();
            self.moving_count = 0;
            self.transition(State::Nop);
            return;
        }

        if let Some(hint) = hint {
            let forced = match hint {
                Hint::DetectBlink => State::CheckingBlink,
                Hint::DetectAngry => State::CheckingAngry,
                Hint::DetectHappy => State::CheckingHappy,
                Hint::DetectDrag => State::Ready,
            };
            if forced != self.state {
                self.buffer.clear();
                self.transition(forced);
            }
        }

        if holding_still {
            self.moving_count = 0;
            self.buffer.push(snapshot);
            if self.buffer.len() >= self.config.expression.still_window {
                let scan = match self.state {
                    State::CheckingBlink => StillScan::BlinkOnly,
                    State::CheckingAngry => StillScan::AngryOnly,
                    State::CheckingHappy => StillScan::HappyOnly,
                    _ => StillScan::All,
                };
                self.evaluate_still_buffer(scan, scale);
                self.buffer.clear();
                if self.state != State::Ready {
                    self.transition(State::Ready);
                }
            }
        } else {
            self.moving_count += 1;
            if self.moving_count >= self.config.expression.moving_debounce {
                self.moving_count = 0;
                self.buffer.clear();
                self.buffer.push(snapshot);
                self.transition(State::DragTracking);
            }
        }
    }

    fn evaluate_still_buffer(&mut self, scan: StillScan, scale: (f64, f64)) {
        let Some(reference) = &self.reference else {
            return;
        };
        let expression = &self.config.expression;
        let mut events = Vec::new();

        if matches!(scan, StillScan::All | StillScan::BlinkOnly) {
            if let Some((lo, hi)) = eyes::find_blink(&self.buffer, expression) {
                let actions =
                    eyes::build_blink_actions(reference, &self.buffer[lo..=hi], scale);
                for action in actions {
                    self.observation.add_action(action);
                }
                events.push(Event::BlinkActionDetected);
            }
        }
        if matches!(scan, StillScan::All | StillScan::AngryOnly) {
            if let Some((lo, hi)) = mouth::find_angry(&self.buffer, expression) {
                let action = mouth::build_angry_action(reference, &self.buffer[lo..=hi], scale);
                self.observation.add_action(action);
                events.push(Event::AngryActionDetected);
            }
        }
        if matches!(scan, StillScan::All | StillScan::HappyOnly) {
            if let Some((lo, hi)) = mouth::find_happy(&self.buffer, expression) {
                let action = mouth::build_happy_action(reference, &self.buffer[lo..=hi], scale);
                self.observation.add_action(action);
                events.push(Event::HappyActionDetected);
            }
        }

        for event in events {
            self.emit(event);
        }
    }

    fn step_drag_tracking(
        &mut self,
        conditions_good: bool,
        holding_still: bool,
        snapshot: Snapshot,
        scale: (f64, f64),
    ) {
        if !conditions_good {
            self.buffer.clear();
            self.transition(State::Nop);
            return;
        }
        if holding_still {
            self.buffer.clear();
            self.transition(State::Ready);
            return;
        }

        let crossed = drag::hit_drag_limit(snapshot.pitch, snapshot.yaw, &self.config.drag);
        self.buffer.push(snapshot);

        if crossed {
            self.analyze_drag(scale);
            self.buffer.clear();
            self.transition(State::Nop);
            return;
        }

        if self.buffer.len() >= 2 {
            let last = self.buffer.len() - 1;
            if drag::going_backward(&self.buffer, last - 1, last, self.config.drag.backward_limit)
            {
                self.warn_observer(Warning::GoingBackward);
            }
            if drag::too_slow(
                &self.buffer,
                last - 1,
                last,
                self.config.fps,
                self.config.drag.slow_limit,
            ) {
                self.warn_observer(Warning::TooSlow);
            }
        }
    }

    fn analyze_drag(&mut self, scale: (f64, f64)) {
        let Some(reference) = &self.reference else {
            return;
        };
        if !drag::has_valid_drag(&self.buffer, &self.config.drag, self.config.fps) {
            self.warn_observer(Warning::InvalidDragAction);
            return;
        }
        let Some(direction) = drag::classify(&self.buffer, &self.config.drag) else {
            self.warn_observer(Warning::InvalidDragAction);
            return;
        };
        let action = drag::build_drag_action(direction, reference, &self.buffer, scale);
        self.observation.add_action(action);
        debug!(
            "drag resolved as {} over {} samples",
            direction.label(),
            self.buffer.len()
        );
        self.emit(DragDirection::event(direction));
    }

    fn transition(&mut self, next: State) {
        debug!(
            "frame {}: {} -> {}",
            self.frame_index,
            self.state.as_str(),
            next.as_str()
        );
        self.previous_state = self.state;
        self.state = next;
    }

    fn emit(&mut self, event: Event) {
        info!("event: {event:?} at frame {}", self.frame_index);
        self.frames_since_event = 0;
        self.timeout_warned = false;
        self.observer.on_event(event);
    }

    fn warn_observer(&mut self, warning: Warning) {
        warn!("warning: {warning:?} at frame {}", self.frame_index);
        self.observer.on_warning(warning);
    }

    fn tick_timeout(&mut self) {
        if self.config.timeout_frames == 0 {
            return;
        }
        self.frames_since_event += 1;
        if self.frames_since_event >= self.config.timeout_frames && !self.timeout_warned {
            self.timeout_warned = true;
            self.warn_observer(Warning::Timeout);
        }
    }
}

/// Thread-shared tracker handle.
///
/// Every operation takes the session lock for its full duration; per-frame
/// work is short, so a single coarse lock is enough.
pub struct SharedTracker<O: GestureObserver = NullObserver> {
    inner: Arc<Mutex<GestureTracker<O>>>,
}

impl<O: GestureObserver> Clone for SharedTracker<O> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<O: GestureObserver> SharedTracker<O> {
    #[must_use]
    pub fn new(tracker: GestureTracker<O>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(tracker)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, GestureTracker<O>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Process one frame under the session lock
    ///
    /// # Errors
    ///
    /// Propagates any error from [`GestureTracker::feed`].
    pub fn feed(&self, frame: &FrameInput<'_>) -> Result<()> {
        self.lock().feed(frame)
    }

    #[must_use]
    pub fn current_state(&self) -> &'static str {
        self.lock().current_state()
    }

    /// Serialized observation document
    ///
    /// # Errors
    ///
    /// Returns a serialization error if JSON encoding fails.
    pub fn observation_json(&self) -> Result<String> {
        self.lock().observation_json()
    }

    pub fn set_media_path(&self, path: impl Into<String>) {
        self.lock().set_media_path(path);
    }

    pub fn reset(&self) {
        self.lock().reset();
    }

    /// Run a closure against the locked tracker, for observer access
    pub fn with<R>(&self, f: impl FnOnce(&mut GestureTracker<O>) -> R) -> R {
        f(&mut self.lock())
    }
}
