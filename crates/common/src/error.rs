//! Error types shared across facecursor crates.

use std::path::PathBuf;

/// Top-level error type for facecursor operations.
#[derive(Debug, thiserror::Error)]
pub enum FacecursorError {
    /// The calibration window cannot produce finite thresholds.
    /// Fatal to the current calibration round; the window must be recollected.
    #[error("Invalid calibration data: {message}")]
    InvalidCalibrationData { message: String },

    /// The face detector failed on a single frame. The frame is skipped.
    #[error("Detector failure: {message}")]
    DetectorFailure { message: String },

    #[error("Session error: {message}")]
    Session { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using FacecursorError.
pub type FacecursorResult<T> = Result<T, FacecursorError>;

impl FacecursorError {
    pub fn invalid_calibration(msg: impl Into<String>) -> Self {
        Self::InvalidCalibrationData {
            message: msg.into(),
        }
    }

    pub fn detector(msg: impl Into<String>) -> Self {
        Self::DetectorFailure {
            message: msg.into(),
        }
    }

    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether this error only affects the frame it was raised on.
    pub fn is_frame_local(&self) -> bool {
        matches!(self, Self::DetectorFailure { .. })
    }
}
