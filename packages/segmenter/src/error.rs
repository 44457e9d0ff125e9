//! Error types for the segmenter.
//!
//! `SegmenterError` is the single error type surfaced to library consumers.
//! Per-volume failures carry the volume key so that a run can report which
//! volumes were skipped without aborting their siblings.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the segmenter library.
#[derive(Debug, Error)]
pub enum SegmenterError {
    /// Settings are unreadable or semantically wrong.
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// Volume text could not be read.
    #[error("Volume '{volume}' is unavailable: {reason}")]
    VolumeUnavailable { volume: String, reason: String },

    /// The volume has no table of contents in the catalog. Reported per
    /// volume, like an unavailable text.
    #[error("Unknown volume '{0}'")]
    UnknownVolume(String),

    /// A persisted artifact exists but cannot be decoded.
    #[error("Corrupt store at {}: {source}", .path.display())]
    CorruptStore {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The run was cancelled before this volume was started.
    #[error("Scan of volume '{0}' was cancelled")]
    Cancelled(String),

    /// The scan worker pool could not be started.
    #[error("Failed to start scan workers: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl SegmenterError {
    /// Build a data-availability error for a volume.
    pub fn unavailable(volume: impl Into<String>, reason: impl ToString) -> Self {
        Self::VolumeUnavailable {
            volume: volume.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for segmenter operations.
pub type Result<T> = std::result::Result<T, SegmenterError>;
