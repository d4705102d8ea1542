//! Login orchestration and reel publishing.

use std::path::Path;

use astroreel_models::{retry, RetryPolicy, Session};
use tracing::{info, warn};

use crate::client::SocialClient;
use crate::error::{PublishError, PublishResult};
use crate::session::SessionStore;

/// Upload size limit enforced by the service.
pub const MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;

/// Drives login and upload against the social service.
///
/// A persisted session is reused across runs when the service still
/// accepts it; otherwise the stale file is discarded and a fresh login
/// is performed. A challenge aborts the run without touching the
/// session file, so whatever state exists on disk stays intact for the
/// operator to inspect.
pub struct Publisher {
    client: SocialClient,
    store: SessionStore,
    username: String,
    password: String,
    session: Option<Session>,
    max_upload_bytes: u64,
    retry: RetryPolicy,
}

impl Publisher {
    pub fn new(
        client: SocialClient,
        store: SessionStore,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            client,
            store,
            username: username.into(),
            password: password.into(),
            session: None,
            max_upload_bytes: MAX_UPLOAD_BYTES,
            retry: RetryPolicy::new("reel_upload"),
        }
    }

    pub fn with_max_upload_bytes(mut self, limit: u64) -> Self {
        self.max_upload_bytes = limit;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Make sure an accepted session is in hand, logging in if needed.
    pub async fn ensure_logged_in(&mut self) -> PublishResult<&Session> {
        if self.session.is_none() {
            if let Some(saved) = self.store.load().await {
                if self.client.validate_session(&saved).await? {
                    info!("Reusing persisted session for {}", self.username);
                    self.session = Some(saved);
                } else {
                    warn!("Persisted session no longer accepted, discarding");
                    self.store.remove().await;
                }
            }
        }

        if self.session.is_none() {
            let fresh = self.client.login(&self.username, &self.password).await?;
            self.store.save(&fresh).await?;
            self.session = Some(fresh);
        }

        // Populated by one of the branches above.
        match self.session.as_ref() {
            Some(session) => Ok(session),
            None => Err(PublishError::LoginFailed("no session established".into())),
        }
    }

    /// Upload a rendered reel with its caption. Returns the media id.
    pub async fn post(&mut self, video_path: &Path, caption: &str) -> PublishResult<String> {
        let metadata = tokio::fs::metadata(video_path)
            .await
            .map_err(|_| PublishError::FileNotFound(video_path.to_path_buf()))?;
        if metadata.len() > self.max_upload_bytes {
            return Err(PublishError::TooLarge {
                size_bytes: metadata.len(),
                limit_bytes: self.max_upload_bytes,
            });
        }

        self.ensure_logged_in().await?;
        let session = match self.session.as_ref() {
            Some(session) => session.clone(),
            None => return Err(PublishError::LoginFailed("no session established".into())),
        };

        let client = &self.client;
        let media_id = retry(&self.retry, || {
            client.upload_reel(&session, video_path, caption)
        })
        .await?;
        info!("Published reel as media {media_id}");
        Ok(media_id)
    }

    /// Download the account's profile picture for use as branding.
    pub async fn fetch_profile_picture(&mut self, dest: &Path) -> PublishResult<()> {
        self.ensure_logged_in().await?;
        let session = match self.session.as_ref() {
            Some(session) => session.clone(),
            None => return Err(PublishError::LoginFailed("no session established".into())),
        };
        self.client.fetch_profile_picture(&session, dest).await
    }
}
