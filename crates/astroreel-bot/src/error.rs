//! Bot error types.

use astroreel_content::ContentError;
use astroreel_publisher::PublishError;
use thiserror::Error;

/// Result type for bot operations.
pub type BotResult<T> = Result<T, BotError>;

/// Errors surfaced during startup and context construction. Per-run
/// pipeline failures are logged and absorbed by the orchestrator, so
/// render errors never appear here.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("content error: {0}")]
    Content(#[from] ContentError),

    #[error("publish error: {0}")]
    Publish(#[from] PublishError),
}

impl BotError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_errors_convert() {
        let err = BotError::from(ContentError::EmptyFeed);
        assert!(matches!(err, BotError::Content(_)));

        let err = BotError::from(PublishError::LoginFailed("bad credentials".into()));
        assert!(err.to_string().contains("login failed"));
    }
}
