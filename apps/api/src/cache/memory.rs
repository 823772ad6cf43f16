//! In-process cache backend.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, instrument};

use crate::cache::store::{matches_any, CacheResult, CacheStats, CacheStore};

/// TTLs are capped so `Instant` arithmetic cannot overflow.
const MAX_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 365);

/// Minimum spacing between full expiry sweeps triggered by writes.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    expires_at: Instant,
    tags: Vec<String>,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Default)]
struct Entries {
    by_key: HashMap<String, CacheEntry>,
    by_tag: HashMap<String, HashSet<String>>,
    next_sweep: Option<Instant>,
}

impl Entries {
    fn remove(&mut self, key: &str) -> bool {
        let Some(entry) = self.by_key.remove(key) else {
            return false;
        };
        for tag in &entry.tags {
            if let Some(keys) = self.by_tag.get_mut(tag) {
                keys.remove(key);
                if keys.is_empty() {
                    self.by_tag.remove(tag);
                }
            }
        }
        true
    }

    fn purge_expired(&mut self, now: Instant) -> usize {
        let expired: Vec<String> = self
            .by_key
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &expired {
            self.remove(key);
        }
        expired.len()
    }

    /// Purges expired entries at most once per `SWEEP_INTERVAL`.
    fn maybe_sweep(&mut self, now: Instant) {
        if self.next_sweep.is_some_and(|at| now < at) {
            return;
        }
        let purged = self.purge_expired(now);
        if purged > 0 {
            debug!("Swept {purged} expired cache entries");
        }
        self.next_sweep = Some(now + SWEEP_INTERVAL);
    }
}

/// `RwLock`-protected map with a tag index. Expired entries are evicted
/// when read and swept periodically on writes.
///
/// Expiry uses `tokio::time::Instant`, so paused-clock tests can drive it.
/// Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<Entries>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for InMemoryStore {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> CacheResult<Option<Value>> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.by_key.get(key) {
                None => {
                    debug!("Cache miss");
                    return Ok(None);
                }
                Some(entry) if !entry.is_expired(now) => {
                    debug!("Cache hit");
                    return Ok(Some(entry.value.clone()));
                }
                Some(_) => {}
            }
        }

        // Expired: evict under the write lock, unless a writer refreshed it meanwhile.
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.by_key.get(key) {
            if !entry.is_expired(now) {
                return Ok(Some(entry.value.clone()));
            }
        }
        entries.remove(key);
        debug!("Cache entry expired");
        Ok(None)
    }

    #[instrument(skip(self, value, tags))]
    async fn set(
        &self,
        key: &str,
        value: Value,
        ttl: Duration,
        tags: &[String],
    ) -> CacheResult<()> {
        let now = Instant::now();
        let expires_at = now + ttl.min(MAX_TTL);

        let mut entries = self.entries.write().await;
        entries.maybe_sweep(now);
        entries.remove(key);
        for tag in tags {
            entries
                .by_tag
                .entry(tag.clone())
                .or_default()
                .insert(key.to_string());
        }
        entries.by_key.insert(
            key.to_string(),
            CacheEntry {
                value,
                expires_at,
                tags: tags.to_vec(),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<bool> {
        Ok(self.entries.write().await.remove(key))
    }

    async fn clear_by_pattern(&self, patterns: &[String]) -> CacheResult<usize> {
        let mut entries = self.entries.write().await;
        let doomed: Vec<String> = entries
            .by_key
            .keys()
            .filter(|k| matches_any(k, patterns))
            .cloned()
            .collect();
        for key in &doomed {
            entries.remove(key);
        }
        Ok(doomed.len())
    }

    async fn invalidate_tags(&self, tags: &[String]) -> CacheResult<usize> {
        let mut entries = self.entries.write().await;
        let mut removed = 0;
        for tag in tags {
            let keys: Vec<String> = entries
                .by_tag
                .get(tag)
                .map(|keys| keys.iter().cloned().collect())
                .unwrap_or_default();
            for key in keys {
                if entries.remove(&key) {
                    removed += 1;
                }
            }
        }
        Ok(removed)
    }

    async fn clear(&self) -> CacheResult<usize> {
        let mut entries = self.entries.write().await;
        let count = entries.by_key.len();
        entries.by_key.clear();
        entries.by_tag.clear();
        Ok(count)
    }

    async fn stats(&self) -> CacheResult<CacheStats> {
        let mut entries = self.entries.write().await;
        entries.purge_expired(Instant::now());
        Ok(CacheStats {
            backend: "memory",
            total_entries: entries.by_key.len(),
            tag_count: entries.by_tag.len(),
        })
    }
}
