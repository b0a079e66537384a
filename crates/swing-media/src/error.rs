//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur during swing analysis.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Failed to open video: {0}")]
    VideoOpen(String),

    #[error("Invalid video file: {0}")]
    InvalidVideo(String),

    #[error("Frame decode failed: {0}")]
    DecodeFailed(String),

    #[error("Insufficient pose data: only {detected} frames detected")]
    InsufficientPoseData { detected: usize },

    #[error("Timestamp {current} ms is not after previous timestamp {previous} ms")]
    NonMonotonicTimestamp { previous: u64, current: u64 },

    #[error("Pose inference failed: {0}")]
    InferenceFailed(String),

    #[error("Model not found: {0}")]
    ModelNotFound(PathBuf),

    #[error("Model download failed: {message}")]
    DownloadFailed { message: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MediaError {
    /// Create an inference failure error.
    pub fn inference_failed(message: impl Into<String>) -> Self {
        Self::InferenceFailed(message.into())
    }

    /// Create a frame decode failure error.
    pub fn decode_failed(message: impl Into<String>) -> Self {
        Self::DecodeFailed(message.into())
    }

    /// Create a download failure error.
    pub fn download_failed(message: impl Into<String>) -> Self {
        Self::DownloadFailed {
            message: message.into(),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_message() {
        let err = MediaError::InsufficientPoseData { detected: 3 };
        assert_eq!(err.to_string(), "Insufficient pose data: only 3 frames detected");
    }
}
