//! Social upload client with persisted sessions.
//!
//! This crate provides:
//! - A low-level HTTP client for the social service (login, session
//!   validation, reel upload, profile picture)
//! - On-disk session persistence
//! - A publisher that drives the login state machine before uploads

pub mod client;
pub mod error;
pub mod publisher;
pub mod session;

pub use client::SocialClient;
pub use error::{PublishError, PublishResult};
pub use publisher::Publisher;
pub use session::SessionStore;
