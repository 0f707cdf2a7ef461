//! Extension sessions issued by the commerce platform's launch handshake.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Platform auth state for one merchant company.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionSession {
    pub session_id: String,
    pub company_id: String,
    pub access_token: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl ExtensionSession {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}

impl fmt::Debug for ExtensionSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionSession")
            .field("session_id", &self.session_id)
            .field("company_id", &self.company_id)
            .field("access_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
