//! Daily astronomy reel bot.
//!
//! This crate provides:
//! - Configuration loading from environment variables
//! - Tracing setup with a daily-rolling log file
//! - The fetch-render-publish orchestrator and its polling scheduler

pub mod config;
pub mod error;
pub mod logging;
pub mod scheduler;

pub use config::Settings;
pub use error::{BotError, BotResult};
pub use logging::init_tracing;
pub use scheduler::{run_forever, run_once, should_post, BotContext};
