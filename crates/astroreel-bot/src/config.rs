//! Bot configuration.

use std::path::PathBuf;
use std::time::Duration;

use astroreel_models::RetryPolicy;
use chrono::NaiveTime;

use crate::error::{BotError, BotResult};

/// Default local posting time, 24h clock.
const DEFAULT_POSTING_TIME: &str = "09:00";

const DEFAULT_HASHTAGS: &[&str] = &[
    "#astronomy",
    "#space",
    "#nasa",
    "#apod",
    "#cosmos",
    "#universe",
    "#astrophotography",
    "#nightsky",
    "#science",
    "#galaxy",
];

/// Bot configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Account credentials (mandatory)
    pub username: String,
    pub password: String,
    /// Local time of day at which the daily post fires
    pub posting_time: NaiveTime,
    /// API key for the picture-of-the-day service
    pub api_key: String,
    /// Branding image used as background or profile picture
    pub branding_image_path: PathBuf,
    /// Use the branding image as a full-frame background
    pub use_branding: bool,
    /// Hashtags appended to every caption
    pub hashtags: Vec<String>,
    pub fps: u32,
    pub duration_secs: u32,
    /// Scratch directory for frames and encoded reels
    pub work_dir: PathBuf,
    /// Persisted session file
    pub session_file: PathBuf,
    pub cache_ttl: Duration,
    /// Remote upload size limit
    pub max_upload_bytes: u64,
    pub retry_max_attempts: u32,
    pub retry_initial_delay: Duration,
    pub retry_backoff_multiplier: f64,
    /// Base-URL overrides for the external services
    pub apod_api_url: String,
    pub news_api_url: String,
    pub social_api_url: String,
    pub log_dir: PathBuf,
    pub log_json: bool,
}

impl Settings {
    /// Load settings from process environment variables.
    pub fn from_env() -> BotResult<Self> {
        Self::from_provider(|key| std::env::var(key).ok())
    }

    /// Load settings from an arbitrary key lookup.
    pub fn from_provider(lookup: impl Fn(&str) -> Option<String>) -> BotResult<Self> {
        let username = lookup("IG_USERNAME")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| BotError::config("IG_USERNAME is required"))?;
        let password = lookup("IG_PASSWORD")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| BotError::config("IG_PASSWORD is required"))?;

        let posting_time_raw =
            lookup("POSTING_TIME").unwrap_or_else(|| DEFAULT_POSTING_TIME.to_string());
        let posting_time = NaiveTime::parse_from_str(&posting_time_raw, "%H:%M")
            .map_err(|_| {
                BotError::config(format!(
                    "POSTING_TIME must be HH:MM, got {posting_time_raw:?}"
                ))
            })?;

        let hashtags = match lookup("BASE_HASHTAGS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            None => DEFAULT_HASHTAGS.iter().map(|s| s.to_string()).collect(),
        };

        Ok(Self {
            username,
            password,
            posting_time,
            api_key: lookup("NASA_API_KEY").unwrap_or_else(|| "DEMO_KEY".to_string()),
            branding_image_path: PathBuf::from(
                lookup("BRANDING_IMAGE_PATH").unwrap_or_else(|| "profile_pic.jpg".to_string()),
            ),
            use_branding: lookup("USE_BRANDING")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            hashtags,
            fps: parse_or(&lookup, "REEL_FPS", 30)?,
            duration_secs: parse_or(&lookup, "REEL_DURATION_SECS", 15)?,
            work_dir: PathBuf::from(lookup("WORK_DIR").unwrap_or_else(|| "output".to_string())),
            session_file: PathBuf::from(
                lookup("SESSION_FILE").unwrap_or_else(|| "session.json".to_string()),
            ),
            cache_ttl: Duration::from_secs(parse_or(&lookup, "CACHE_TTL_SECS", 3600)?),
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", 100 * 1024 * 1024)?,
            retry_max_attempts: parse_or(&lookup, "RETRY_MAX_ATTEMPTS", 3)?,
            retry_initial_delay: Duration::from_secs(parse_or(
                &lookup,
                "RETRY_INITIAL_DELAY_SECS",
                2,
            )?),
            retry_backoff_multiplier: parse_or(&lookup, "RETRY_BACKOFF_MULTIPLIER", 2.0)?,
            apod_api_url: lookup("APOD_API_URL")
                .unwrap_or_else(|| astroreel_content::client::DEFAULT_APOD_URL.to_string()),
            news_api_url: lookup("NEWS_API_URL")
                .unwrap_or_else(|| astroreel_content::client::DEFAULT_NEWS_URL.to_string()),
            social_api_url: lookup("SOCIAL_API_URL")
                .unwrap_or_else(|| "https://social.api.example.com".to_string()),
            log_dir: PathBuf::from(lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string())),
            log_json: lookup("LOG_FORMAT")
                .map(|v| v.to_lowercase() == "json")
                .unwrap_or(false),
        })
    }

    /// Retry policy applied around network operations.
    pub fn retry_policy(&self, operation_name: &str) -> RetryPolicy {
        RetryPolicy::new(operation_name)
            .with_max_attempts(self.retry_max_attempts)
            .with_initial_delay(self.retry_initial_delay)
            .with_backoff_multiplier(self.retry_backoff_multiplier)
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> BotResult<T> {
    match lookup(key) {
        Some(raw) => raw
            .parse()
            .map_err(|_| BotError::config(format!("{key} has invalid value {raw:?}"))),
        None => Ok(default),
    }
}
