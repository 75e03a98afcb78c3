//! Whole-page cache for the index feed.
//!
//! Entries live for a fixed TTL and are never invalidated by writes, so a new
//! post shows up on the index only after expiry or an explicit [`PageCache::clear`].

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use yatube_core::ports::Cache;

const INDEX_PREFIX: &str = "index_page:";

#[derive(Clone)]
pub struct PageCache {
    backend: Arc<dyn Cache>,
    ttl: Duration,
}

impl PageCache {
    pub fn new(backend: Arc<dyn Cache>, ttl: Duration) -> Self {
        Self { backend, ttl }
    }

    /// Cache key of one rendering of the index: the resolved page number plus
    /// who is looking, since the navigation differs per user.
    pub fn index_key(page: u64, viewer: Option<Uuid>) -> String {
        let viewer = viewer.map_or_else(|| "anonymous".to_string(), |id| id.to_string());
        format!("{INDEX_PREFIX}{page}:{viewer}")
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.backend.get(key).await
    }

    pub async fn put(&self, key: &str, html: &str) {
        if self.ttl.is_zero() {
            return;
        }
        if let Err(e) = self.backend.set(key, html, Some(self.ttl)).await {
            tracing::warn!(error = %e, key, "Failed to cache page");
        }
    }

    /// Drop every cached index page.
    pub async fn clear(&self) -> usize {
        match self.backend.delete_prefix(INDEX_PREFIX).await {
            Ok(removed) => {
                tracing::debug!(removed, "Index page cache cleared");
                removed
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to clear index page cache");
                0
            }
        }
    }
}
