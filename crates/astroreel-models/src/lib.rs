//! Shared data models for the AstroReel pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Daily content items and their origin
//! - Rendered reel metadata
//! - Persisted login sessions
//! - Retry policy applied around network operations

pub mod content;
pub mod reel;
pub mod retry;
pub mod session;

// Re-export common types
pub use content::{ContentItem, ContentOrigin};
pub use reel::{RenderedReel, REEL_HEIGHT, REEL_WIDTH};
pub use retry::{retry, RetryPolicy};
pub use session::Session;
