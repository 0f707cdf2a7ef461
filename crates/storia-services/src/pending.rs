//! Pending publish table
//!
//! `GET /publish` parks the confirmed draft here under a random nonce that
//! travels through Instagram as the OAuth `state`. The callback takes it back
//! out. Entries are single-use and expire after the configured TTL.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::interval;
use uuid::Uuid;

use storia_core::models::{PendingPublish, StoryDraft};

#[derive(Debug, Clone)]
pub struct PendingPublishStore {
    entries: Arc<RwLock<HashMap<Uuid, PendingPublish>>>,
    ttl: ChronoDuration,
}

impl PendingPublishStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl: ChronoDuration::from_std(ttl).unwrap_or(ChronoDuration::MAX),
        }
    }

    /// Park a draft and return the nonce to use as OAuth `state`.
    pub async fn insert(&self, draft: StoryDraft) -> Uuid {
        self.insert_at(draft, Utc::now()).await
    }

    async fn insert_at(&self, draft: StoryDraft, now: DateTime<Utc>) -> Uuid {
        let nonce = Uuid::new_v4();
        let mut entries = self.entries.write().await;
        entries.insert(
            nonce,
            PendingPublish {
                nonce,
                draft,
                created_at: now,
            },
        );
        nonce
    }

    /// Remove and return the draft for `state`.
    ///
    /// Returns `None` for malformed, unknown, already consumed or expired states.
    pub async fn take(&self, state: &str) -> Option<StoryDraft> {
        self.take_at(state, Utc::now()).await
    }

    async fn take_at(&self, state: &str, now: DateTime<Utc>) -> Option<StoryDraft> {
        let nonce = Uuid::parse_str(state.trim()).ok()?;
        let pending = self.entries.write().await.remove(&nonce)?;

        if self.is_expired(&pending, now) {
            tracing::debug!(nonce = %nonce, "Pending publish expired before callback");
            return None;
        }
        Some(pending.draft)
    }

    fn is_expired(&self, pending: &PendingPublish, now: DateTime<Utc>) -> bool {
        now - pending.created_at >= self.ttl
    }

    /// Drop expired entries, returning how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, pending| !self.is_expired(pending, now));
        before - entries.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Start the background purge task.
    /// Returns a JoinHandle for graceful shutdown
    pub fn start_purge(self: Arc<Self>, every: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut purge_interval = interval(every);

            loop {
                purge_interval.tick().await;

                let purged = self.purge_expired().await;
                if purged > 0 {
                    tracing::info!(purged, "Purged expired pending publishes");
                }
            }
        })
    }
}
