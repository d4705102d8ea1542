//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur while rendering or encoding a reel.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("FFmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("FFmpeg command failed: {message}")]
    FfmpegFailed {
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    #[error("Encoder timed out after {0} seconds")]
    Timeout(u64),

    #[error("Image download failed: {message}")]
    DownloadFailed { message: String },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Rendered file is {size_bytes} bytes, over the {limit_bytes} byte upload limit")]
    TooLarge { size_bytes: u64, limit_bytes: u64 },

    #[error("Rendered file is suspiciously small ({size_bytes} bytes)")]
    TooSmall { size_bytes: u64 },

    #[error("Encoding failed: {0}")]
    EncodeFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    /// Create an FFmpeg failure error.
    pub fn ffmpeg_failed(
        message: impl Into<String>,
        stderr: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::FfmpegFailed {
            message: message.into(),
            stderr,
            exit_code,
        }
    }

    /// Create a download failure error.
    pub fn download_failed(message: impl Into<String>) -> Self {
        Self::DownloadFailed {
            message: message.into(),
        }
    }

    /// True when the external encoder should be abandoned in favor of
    /// the in-process fallback path.
    pub fn wants_fallback_encoder(&self) -> bool {
        matches!(
            self,
            MediaError::FfmpegNotFound | MediaError::FfmpegFailed { .. } | MediaError::Timeout(_)
        )
    }
}
