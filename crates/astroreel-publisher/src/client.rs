//! Low-level HTTP client for the social service.

use std::path::Path;
use std::time::Duration;

use astroreel_models::Session;
use reqwest::multipart;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{PublishError, PublishResult};

/// Timeout for login and account requests.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for the video upload itself.
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(180);

const USER_AGENT: &str = concat!("astroreel/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct LoginResponse {
    user_id: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    error_type: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct CurrentAccount {
    #[allow(dead_code)]
    user_id: String,
    profile_pic_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    media_id: String,
}

/// HTTP client for login, session validation and reel upload.
#[derive(Debug, Clone)]
pub struct SocialClient {
    http: reqwest::Client,
    base_url: String,
}

impl SocialClient {
    pub fn new(base_url: impl Into<String>) -> PublishResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Log in with credentials and obtain a fresh session.
    ///
    /// A challenge response from the service is surfaced as
    /// [`PublishError::ChallengeRequired`]; retrying it without human
    /// action cannot succeed.
    pub async fn login(&self, username: &str, password: &str) -> PublishResult<Session> {
        debug!("Logging in as {username}");
        let response = self
            .http
            .post(format!("{}/api/v1/accounts/login", self.base_url))
            .timeout(REQUEST_TIMEOUT)
            .json(&serde_json::json!({
                "username": username,
                "password": password,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body: ApiErrorBody = response.json().await.unwrap_or(ApiErrorBody {
                error_type: String::new(),
                message: String::new(),
            });
            if body.error_type == "challenge_required" {
                return Err(PublishError::ChallengeRequired(if body.message.is_empty() {
                    "the service requires additional verification".to_string()
                } else {
                    body.message
                }));
            }
            return Err(PublishError::LoginFailed(format!(
                "status {status}: {}",
                body.message
            )));
        }

        let body: LoginResponse = response.json().await?;
        info!("Login successful for {username}");
        Ok(Session::new(body.user_id, body.token))
    }

    /// Check whether a persisted session is still accepted.
    pub async fn validate_session(&self, session: &Session) -> PublishResult<bool> {
        let response = self
            .http
            .get(format!("{}/api/v1/accounts/current", self.base_url))
            .timeout(REQUEST_TIMEOUT)
            .bearer_auth(&session.token)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(true);
        }
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Ok(false);
        }
        Err(PublishError::UnexpectedStatus {
            status: status.as_u16(),
            message: "session validation".to_string(),
        })
    }

    /// Upload a reel video with its caption. Returns the media id.
    pub async fn upload_reel(
        &self,
        session: &Session,
        video_path: &Path,
        caption: &str,
    ) -> PublishResult<String> {
        let bytes = tokio::fs::read(video_path).await?;
        let file_name = video_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "reel.mp4".to_string());

        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("video/mp4")?;
        let form = multipart::Form::new()
            .text("caption", caption.to_string())
            .part("video", part);

        let response = self
            .http
            .post(format!("{}/api/v1/media/reels", self.base_url))
            .timeout(UPLOAD_TIMEOUT)
            .bearer_auth(&session.token)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::upload_failed(format!(
                "status {status}: {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let body: UploadResponse = response.json().await?;
        Ok(body.media_id)
    }

    /// Download the account's profile picture, for use as the branding
    /// image when none exists locally.
    pub async fn fetch_profile_picture(
        &self,
        session: &Session,
        dest: &Path,
    ) -> PublishResult<()> {
        let response = self
            .http
            .get(format!("{}/api/v1/accounts/current", self.base_url))
            .timeout(REQUEST_TIMEOUT)
            .bearer_auth(&session.token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PublishError::UnexpectedStatus {
                status: status.as_u16(),
                message: "fetch profile picture".to_string(),
            });
        }

        let account: CurrentAccount = response.json().await?;
        let url = account.profile_pic_url.ok_or_else(|| {
            PublishError::upload_failed("account has no profile picture URL")
        })?;

        let picture = self
            .http
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        if let Some(parent) = dest.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(dest, &picture).await?;
        info!("Saved profile picture to {}", dest.display());
        Ok(())
    }
}
