//! Persisted login session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An opaque authentication token persisted to disk after a successful
/// login, so the next run skips interactive login.
///
/// Discarded when the remote service rejects it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub token: String,
    pub saved_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            token: token.into(),
            saved_at: Utc::now(),
        }
    }
}
