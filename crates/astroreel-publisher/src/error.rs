//! Publisher error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for publish operations.
pub type PublishResult<T> = Result<T, PublishError>;

/// Errors that can occur while logging in or uploading.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("challenge required: {0}")]
    ChallengeRequired(String),

    #[error("login failed: {0}")]
    LoginFailed(String),

    #[error("upload failed: {message}")]
    UploadFailed { message: String },

    #[error("service returned unexpected status {status}: {message}")]
    UnexpectedStatus { status: u16, message: String },

    #[error("video file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("video file is {size_bytes} bytes, over the {limit_bytes} byte upload limit")]
    TooLarge { size_bytes: u64, limit_bytes: u64 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PublishError {
    pub fn upload_failed(message: impl Into<String>) -> Self {
        Self::UploadFailed {
            message: message.into(),
        }
    }

    /// Whether the orchestrator's retry helper should re-attempt.
    ///
    /// A challenge needs human action; retrying without it cannot
    /// succeed. Oversized or missing files never fix themselves.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PublishError::UploadFailed { .. }
                | PublishError::Http(_)
                | PublishError::UnexpectedStatus { .. }
        )
    }
}
