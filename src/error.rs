//! Error types for the face gesture detection library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// No pose transform was supplied for a frame
    #[error("no pose data for frame {0}")]
    MissingPoseData(u64),

    /// No landmark list (or a truncated one) was supplied for a frame
    #[error("missing landmarks: expected {expected}, got {got}")]
    MissingLandmarks { expected: usize, got: usize },

    /// A landmark index fell outside the fixed face-mesh topology
    #[error("landmark index {0} out of range")]
    InvalidLandmarkIndex(usize),

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Observation document serialization failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Invalid input parameters provided
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
