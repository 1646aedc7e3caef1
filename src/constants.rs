//! Constants used throughout the library: the fixed face-mesh landmark
//! topology and the default detection thresholds.

/// Number of facial landmarks in the fixed mesh topology
pub const NUM_FACE_LANDMARKS: usize = 468;

/// Default frames per second assumption for timestamps and angular velocity
pub const DEFAULT_FPS: f64 = 30.0;

/// Cosine threshold below which the pose decomposition is gimbal locked
pub const GIMBAL_LOCK_EPSILON: f64 = 1e-4;

/// Neutral angle of buffered snapshots; drag rules measure deviation from it
pub const SNAPSHOT_CENTER_DEG: f64 = 180.0;

// Reference / hold-still bands (degrees around 0/360)
pub const DEFAULT_REFERENCE_RANGE: f64 = 3.0;
pub const DEFAULT_HOLD_STILL_RANGE: f64 = 5.0;

// Distance limits (units of the pose transform's translation)
pub const DEFAULT_MAX_DISTANCE: f64 = 40.0;
pub const DEFAULT_MIN_DISTANCE_MOBILE: f64 = 30.0;
pub const DEFAULT_MIN_DISTANCE_DESKTOP: f64 = 35.0;

/// Frame-centering tolerance around the letterbox center, in pixels
pub const DEFAULT_CENTER_RANGE: f64 = 50.0;

// Drag rule defaults (degrees / degrees-per-second)
pub const DEFAULT_DRAG_ENDING_LIMIT_YAW: f64 = 20.0;
pub const DEFAULT_DRAG_ENDING_LIMIT_PITCH_UP: f64 = 15.0;
pub const DEFAULT_DRAG_ENDING_LIMIT_PITCH_DOWN: f64 = 15.0;
pub const DEFAULT_DRAG_BACKWARD_LIMIT: f64 = 3.0;
pub const DEFAULT_DRAG_SLOW_LIMIT: f64 = 7.0;
pub const DEFAULT_DRAG_OUT_OF_RANGE_LIMIT: f64 = 10.0;
pub const MIN_DRAG_SNAPSHOTS: usize = 5;

// Expression thresholds, mobile / desktop profiles
pub const DEFAULT_EAR_THRESHOLD_MOBILE: f64 = 0.16;
pub const DEFAULT_EAR_THRESHOLD_DESKTOP: f64 = 0.35;
pub const DEFAULT_MHAR_THRESHOLD_MOBILE: f64 = 16.0;
pub const DEFAULT_MHAR_THRESHOLD_DESKTOP: f64 = 13.0;
pub const DEFAULT_MWAR2_THRESHOLD_MOBILE: f64 = 30.0;
pub const DEFAULT_MWAR2_THRESHOLD_DESKTOP: f64 = 13.0;

/// Frames an expression detector looks back from its trigger sample
pub const DEFAULT_DETECTION_LOOKBACK: usize = 10;

/// Hold-still buffer length that triggers the expression detectors
pub const DEFAULT_STILL_WINDOW: usize = 90;

/// Frames of sustained movement before Ready hands off to DragTracking
pub const DEFAULT_MOVING_DEBOUNCE: usize = 5;

/// Frames without any detected event before a Timeout warning fires
pub const DEFAULT_TIMEOUT_FRAMES: u64 = 900;

/// Nose tip, used for frame centering and as the per-frame anchor point
pub const NOSE_ANCHOR: usize = 4;

// Drag waypoint reference landmarks
pub const LEFT_CHIN: usize = 352;
pub const RIGHT_CHIN: usize = 123;
pub const FOREHEAD: usize = 151;
pub const UNDER_MOUTH: usize = 199;
pub const NOSE_TIP: usize = 19;

// Left eye: bounding box extremes, then EAR pairs
pub const LEFT_EYE_LEFT_EDGE: usize = 353;
pub const LEFT_EYE_RIGHT_EDGE: usize = 413;
pub const LEFT_EYE_UP_EDGE: usize = 443;
pub const LEFT_EYE_DOWN_EDGE: usize = 451;
pub const LEFT_EYE_VERT1_UP: usize = 385;
pub const LEFT_EYE_VERT1_DOWN: usize = 380;
pub const LEFT_EYE_VERT2_UP: usize = 386;
pub const LEFT_EYE_VERT2_DOWN: usize = 374;
pub const LEFT_EYE_HORZ_RIGHT: usize = 362;
pub const LEFT_EYE_HORZ_LEFT: usize = 263;

// Right eye
pub const RIGHT_EYE_LEFT_EDGE: usize = 189;
pub const RIGHT_EYE_RIGHT_EDGE: usize = 124;
pub const RIGHT_EYE_UP_EDGE: usize = 223;
pub const RIGHT_EYE_DOWN_EDGE: usize = 231;
pub const RIGHT_EYE_VERT1_UP: usize = 159;
pub const RIGHT_EYE_VERT1_DOWN: usize = 145;
pub const RIGHT_EYE_VERT2_UP: usize = 158;
pub const RIGHT_EYE_VERT2_DOWN: usize = 153;
pub const RIGHT_EYE_HORZ_RIGHT: usize = 33;
pub const RIGHT_EYE_HORZ_LEFT: usize = 133;

// Lip edges sampled at three horizontal positions (right, middle, left)
pub const UPPER_LIP_UPPER: [usize; 3] = [38, 12, 268];
pub const UPPER_LIP_LOWER: [usize; 3] = [82, 13, 312];
pub const LOWER_LIP_UPPER: [usize; 3] = [87, 14, 317];
pub const LOWER_LIP_LOWER: [usize; 3] = [86, 15, 316];

// Mouth corners
pub const MOUTH_RIGHT_CORNER: usize = 61;
pub const MOUTH_LEFT_CORNER: usize = 291;

// Angry mouth bounding box and tracked edges
pub const ANGRY_BOX_RIGHT: usize = 167;
pub const ANGRY_BOX_LEFT: usize = 393;
pub const ANGRY_BOX_UPPER: usize = 164;
pub const ANGRY_BOX_LOWER: usize = 18;
pub const ANGRY_TRACK_UPPER_START: usize = 0;
pub const ANGRY_TRACK_LOWER_START: usize = 17;
pub const ANGRY_TRACK_UPPER_END: usize = 164;
pub const ANGRY_TRACK_LOWER_END: usize = 18;

// Happy mouth bounding box and tracked corners
pub const HAPPY_BOX_RIGHT: usize = 216;
pub const HAPPY_BOX_LEFT: usize = 436;
pub const HAPPY_BOX_LOWER: usize = 202;
pub const HAPPY_TRACK_RIGHT_START: usize = 61;
pub const HAPPY_TRACK_LEFT_START: usize = 291;
pub const HAPPY_TRACK_RIGHT_END: usize = 214;
pub const HAPPY_TRACK_LEFT_END: usize = 434;
