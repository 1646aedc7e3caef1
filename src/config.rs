//! Configuration management for the gesture detection session

use crate::constants::{
    DEFAULT_CENTER_RANGE, DEFAULT_DETECTION_LOOKBACK, DEFAULT_DRAG_BACKWARD_LIMIT,
    DEFAULT_DRAG_ENDING_LIMIT_PITCH_DOWN, DEFAULT_DRAG_ENDING_LIMIT_PITCH_UP,
    DEFAULT_DRAG_ENDING_LIMIT_YAW, DEFAULT_DRAG_OUT_OF_RANGE_LIMIT, DEFAULT_DRAG_SLOW_LIMIT,
    DEFAULT_EAR_THRESHOLD_DESKTOP, DEFAULT_EAR_THRESHOLD_MOBILE, DEFAULT_FPS,
    DEFAULT_HOLD_STILL_RANGE, DEFAULT_MAX_DISTANCE, DEFAULT_MHAR_THRESHOLD_DESKTOP,
    DEFAULT_MHAR_THRESHOLD_MOBILE, DEFAULT_MIN_DISTANCE_DESKTOP, DEFAULT_MIN_DISTANCE_MOBILE,
    DEFAULT_MOVING_DEBOUNCE, DEFAULT_MWAR2_THRESHOLD_DESKTOP, DEFAULT_MWAR2_THRESHOLD_MOBILE,
    DEFAULT_REFERENCE_RANGE, DEFAULT_STILL_WINDOW, DEFAULT_TIMEOUT_FRAMES,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Named threshold profile.
///
/// The mobile and desktop capture setups sit at different distances from the
/// face, which shifts every expression threshold; the profile picks a
/// consistent set. Individual values can still be overridden in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    #[default]
    Mobile,
    Desktop,
}

/// Coordinate space of ROIs and tracked positions in the observation tree.
///
/// The landmark feed is normalized; `Pixel` scales action geometry by the
/// frame dimensions at build time. Resolved once per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateSpace {
    #[default]
    Normalized,
    Pixel,
}

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Threshold profile the defaults below were derived from
    pub profile: Profile,

    /// Coordinate space for serialized ROIs and tracked positions
    pub coordinate_space: CoordinateSpace,

    /// Frame rate of the perception feed
    pub fps: f64,

    /// Pose banding and framing
    pub pose: PoseConfig,

    /// Drag validation and direction resolution
    pub drag: DragConfig,

    /// Blink / angry / happy detection
    pub expression: ExpressionConfig,

    /// Frames without any event before a Timeout warning, 0 disables
    pub timeout_frames: u64,
}

/// Pose banding, distance and framing parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoseConfig {
    /// Half-width of the reference band around 0°/360°
    pub reference_range: f64,

    /// Half-width of the hold-still band around 0°/360°
    pub hold_still_range: f64,

    /// Distance above which the face is too far
    pub max_distance: f64,

    /// Distance below which the face is too close
    pub min_distance: f64,

    /// Pixel tolerance around the letterbox center for the nose tip
    pub center_range: f64,
}

/// Drag validation parameters (degrees, degrees per second)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DragConfig {
    /// Final-sample yaw threshold for left/right drags
    pub ending_limit_yaw: f64,

    /// Final-sample pitch threshold for up drags
    pub ending_limit_pitch_up: f64,

    /// Final-sample pitch threshold for down drags
    pub ending_limit_pitch_down: f64,

    /// Center-ward angular regression tolerated between consecutive samples
    pub backward_limit: f64,

    /// Minimum angular velocity of a valid drag
    pub slow_limit: f64,

    /// Tolerance the orthogonal axis must stay within for the whole run
    pub out_of_range_limit: f64,
}

/// Expression (blink / angry / happy) detection parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpressionConfig {
    /// Eye aspect ratio at or below which the eyes count as closed
    pub ear_threshold: f64,

    /// Mouth height aspect ratio at or above which the mouth reads angry
    pub mhar_threshold: f64,

    /// Mouth width aspect ratio at or above which the mouth reads happy
    pub mwar2_threshold: f64,

    /// Samples a detector looks back from its trigger index
    pub lookback: usize,

    /// Hold-still buffer length that triggers detector evaluation
    pub still_window: usize,

    /// Frames of sustained movement before Ready enters DragTracking
    pub moving_debounce: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self::for_profile(Profile::Mobile)
    }
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            reference_range: DEFAULT_REFERENCE_RANGE,
            hold_still_range: DEFAULT_HOLD_STILL_RANGE,
            max_distance: DEFAULT_MAX_DISTANCE,
            min_distance: DEFAULT_MIN_DISTANCE_MOBILE,
            center_range: DEFAULT_CENTER_RANGE,
        }
    }
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            ending_limit_yaw: DEFAULT_DRAG_ENDING_LIMIT_YAW,
            ending_limit_pitch_up: DEFAULT_DRAG_ENDING_LIMIT_PITCH_UP,
            ending_limit_pitch_down: DEFAULT_DRAG_ENDING_LIMIT_PITCH_DOWN,
            backward_limit: DEFAULT_DRAG_BACKWARD_LIMIT,
            slow_limit: DEFAULT_DRAG_SLOW_LIMIT,
            out_of_range_limit: DEFAULT_DRAG_OUT_OF_RANGE_LIMIT,
        }
    }
}

impl Default for ExpressionConfig {
    fn default() -> Self {
        Self {
            ear_threshold: DEFAULT_EAR_THRESHOLD_MOBILE,
            mhar_threshold: DEFAULT_MHAR_THRESHOLD_MOBILE,
            mwar2_threshold: DEFAULT_MWAR2_THRESHOLD_MOBILE,
            lookback: DEFAULT_DETECTION_LOOKBACK,
            still_window: DEFAULT_STILL_WINDOW,
            moving_debounce: DEFAULT_MOVING_DEBOUNCE,
        }
    }
}

impl Config {
    /// Build the preset for a named threshold profile
    #[must_use]
    pub fn for_profile(profile: Profile) -> Self {
        let (ear, mhar, mwar2, min_distance) = match profile {
            Profile::Mobile => (
                DEFAULT_EAR_THRESHOLD_MOBILE,
                DEFAULT_MHAR_THRESHOLD_MOBILE,
                DEFAULT_MWAR2_THRESHOLD_MOBILE,
                DEFAULT_MIN_DISTANCE_MOBILE,
            ),
            Profile::Desktop => (
                DEFAULT_EAR_THRESHOLD_DESKTOP,
                DEFAULT_MHAR_THRESHOLD_DESKTOP,
                DEFAULT_MWAR2_THRESHOLD_DESKTOP,
                DEFAULT_MIN_DISTANCE_DESKTOP,
            ),
        };
        Self {
            profile,
            coordinate_space: CoordinateSpace::default(),
            fps: DEFAULT_FPS,
            pose: PoseConfig {
                min_distance,
                ..PoseConfig::default()
            },
            drag: DragConfig::default(),
            expression: ExpressionConfig {
                ear_threshold: ear,
                mhar_threshold: mhar,
                mwar2_threshold: mwar2,
                ..ExpressionConfig::default()
            },
            timeout_frames: DEFAULT_TIMEOUT_FRAMES,
        }
    }

    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| Error::ConfigError(format!("failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("failed to serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` describing the first inconsistent value.
    pub fn validate(&self) -> Result<()> {
        if self.fps <= 0.0 {
            return Err(Error::ConfigError("fps must be positive".to_string()));
        }
        if self.pose.reference_range <= 0.0 || self.pose.reference_range >= 180.0 {
            return Err(Error::ConfigError(
                "reference range must be in (0, 180)".to_string(),
            ));
        }
        if self.pose.hold_still_range < self.pose.reference_range {
            return Err(Error::ConfigError(
                "hold-still range must be at least the reference range".to_string(),
            ));
        }
        if self.pose.min_distance >= self.pose.max_distance {
            return Err(Error::ConfigError(
                "min distance must be below max distance".to_string(),
            ));
        }
        if self.drag.slow_limit < 0.0 || self.drag.backward_limit < 0.0 {
            return Err(Error::ConfigError(
                "drag limits must be non-negative".to_string(),
            ));
        }
        if self.expression.still_window <= self.expression.lookback {
            return Err(Error::ConfigError(
                "still window must exceed the detection lookback".to_string(),
            ));
        }
        if self.expression.ear_threshold <= 0.0 {
            return Err(Error::ConfigError(
                "EAR threshold must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Face gesture detection configuration

profile: mobile
coordinate_space: normalized
fps: 30.0

pose:
  reference_range: 3.0
  hold_still_range: 5.0
  max_distance: 40.0
  min_distance: 30.0
  center_range: 50.0

drag:
  ending_limit_yaw: 20.0
  ending_limit_pitch_up: 15.0
  ending_limit_pitch_down: 15.0
  backward_limit: 3.0
  slow_limit: 7.0
  out_of_range_limit: 10.0

expression:
  ear_threshold: 0.16
  mhar_threshold: 16.0
  mwar2_threshold: 30.0
  lookback: 10
  still_window: 90
  moving_debounce: 5

timeout_frames: 900
"#;
