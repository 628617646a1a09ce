//! Caller-visible failures of the analysis pipeline
//!
//! Only conditions that make a whole request meaningless are surfaced here.
//! Missing channels and thin stints are recovered from locally; see
//! [`crate::degradation::StintSkip`] for the latter.

use thiserror::Error;

/// Errors returned to the caller of the analysis API
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("No telemetry data: {reason}")]
    NoTelemetryData { reason: String },

    #[error("No valid lap data found for the requested drivers")]
    NoLapData,

    #[error("Resolution must be at least 2 grid points, got {0}")]
    InvalidResolution(usize),

    #[error("Frames are not aligned on the same grid ({left} vs {right} points)")]
    FrameLengthMismatch { left: usize, right: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl AnalysisError {
    pub(crate) fn no_telemetry(reason: impl Into<String>) -> Self {
        Self::NoTelemetryData {
            reason: reason.into(),
        }
    }
}

/// Result type for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;
