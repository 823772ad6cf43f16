use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{info, warn};

use crate::cache::memory::InMemoryStore;
use crate::cache::store::{CacheStats, CacheStore, CacheTag};

/// Typed, best-effort facade over a [`CacheStore`].
///
/// Constructed once in `main` and carried in `AppState`. Backend failures are
/// logged and reported as a miss (reads) or as nothing cleared (writes); they
/// never fail the request that triggered them.
#[derive(Clone)]
pub struct ResponseCache {
    store: Arc<dyn CacheStore>,
}

impl ResponseCache {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStore::new()))
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.store.get(key).await {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(hit) => Some(hit),
                Err(e) => {
                    warn!("Discarding undecodable cache entry {key}: {e}");
                    self.delete(key).await;
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("Cache read failed for {key}: {e}");
                None
            }
        }
    }

    pub async fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Duration, tags: &[CacheTag]) {
        let value = match serde_json::to_value(value) {
            Ok(v) => v,
            Err(e) => {
                warn!("Not caching {key}: {e}");
                return;
            }
        };
        let tags: Vec<String> = tags.iter().map(ToString::to_string).collect();
        if let Err(e) = self.store.set(key, value, ttl, &tags).await {
            warn!("Cache write failed for {key}: {e}");
        }
    }

    pub async fn delete(&self, key: &str) -> bool {
        self.store.delete(key).await.unwrap_or_else(|e| {
            warn!("Cache delete failed for {key}: {e}");
            false
        })
    }

    pub async fn clear_by_pattern<S: AsRef<str>>(&self, patterns: &[S]) -> usize {
        let patterns: Vec<String> = patterns.iter().map(|p| p.as_ref().to_string()).collect();
        match self.store.clear_by_pattern(&patterns).await {
            Ok(cleared) => {
                info!("Cleared {cleared} cache entries matching {patterns:?}");
                cleared
            }
            Err(e) => {
                warn!("Pattern clear failed for {patterns:?}: {e}");
                0
            }
        }
    }

    pub async fn invalidate(&self, tags: &[CacheTag]) -> usize {
        let tags: Vec<String> = tags.iter().map(ToString::to_string).collect();
        match self.store.invalidate_tags(&tags).await {
            Ok(cleared) => {
                info!("Cleared {cleared} cache entries tagged {tags:?}");
                cleared
            }
            Err(e) => {
                warn!("Tag invalidation failed for {tags:?}: {e}");
                0
            }
        }
    }

    pub async fn clear(&self) -> usize {
        match self.store.clear().await {
            Ok(cleared) => {
                info!("All caches cleared ({cleared} entries)");
                cleared
            }
            Err(e) => {
                warn!("Cache clear failed: {e}");
                0
            }
        }
    }

    pub async fn stats(&self) -> Option<CacheStats> {
        self.store
            .stats()
            .await
            .map_err(|e| warn!("Cache stats unavailable: {e}"))
            .ok()
    }
}
