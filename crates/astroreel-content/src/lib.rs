//! Daily astronomy content source.
//!
//! This crate provides:
//! - An APOD-style HTTP client (primary source)
//! - A space-news feed client (fallback source)
//! - A date-keyed in-memory cache with TTL
//! - Caption generation for the upload

pub mod apod;
pub mod cache;
pub mod caption;
pub mod client;
pub mod error;
pub mod news;

pub use apod::ApodClient;
pub use cache::{cache_key, DailyCache};
pub use caption::build_caption;
pub use client::{ContentClient, ContentConfig};
pub use error::{ContentError, ContentResult};
pub use news::NewsClient;
