//! On-disk session persistence.

use std::path::{Path, PathBuf};

use astroreel_models::Session;
use tracing::{debug, warn};

use crate::error::PublishResult;

/// Loads and saves the opaque session token file.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted session, if any. An unreadable or corrupt
    /// file is treated as no session.
    pub async fn load(&self) -> Option<Session> {
        if !self.path.exists() {
            return None;
        }
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(session) => {
                    debug!("Loaded session from {}", self.path.display());
                    Some(session)
                }
                Err(e) => {
                    warn!("Session file is corrupt, ignoring: {e}");
                    None
                }
            },
            Err(e) => {
                warn!("Failed to read session file: {e}");
                None
            }
        }
    }

    /// Persist the session for the next run.
    pub async fn save(&self, session: &Session) -> PublishResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_vec_pretty(session)?;
        tokio::fs::write(&self.path, json).await?;
        debug!("Saved session to {}", self.path.display());
        Ok(())
    }

    /// Discard an invalidated session file.
    pub async fn remove(&self) {
        if self.path.exists() {
            if let Err(e) = tokio::fs::remove_file(&self.path).await {
                warn!("Failed to remove session file: {e}");
            }
        }
    }
}
