//! Error types for content fetching.

use thiserror::Error;

/// Result type for content operations.
pub type ContentResult<T> = Result<T, ContentError>;

/// Errors that can occur while fetching daily content.
///
/// None of these are fatal to the pipeline: the content client degrades
/// to the fallback source and finally to placeholder content.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{source_name} returned unexpected status {status}")]
    UnexpectedStatus { source_name: &'static str, status: u16 },

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("news feed returned no articles")]
    EmptyFeed,
}

impl ContentError {
    pub fn unexpected_status(source_name: &'static str, status: u16) -> Self {
        Self::UnexpectedStatus {
            source_name,
            status,
        }
    }
}
