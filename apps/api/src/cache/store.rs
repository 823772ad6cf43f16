use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Invalidation label attached to cache entries at write time.
///
/// A mutation invalidates by tag instead of guessing which key substrings
/// its readers used.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheTag {
    Jobs,
    Job(Uuid),
    Employers,
    Employer(Uuid),
    Applications,
}

impl fmt::Display for CacheTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheTag::Jobs => f.write_str("jobs"),
            CacheTag::Job(id) => write!(f, "job:{id}"),
            CacheTag::Employers => f.write_str("employers"),
            CacheTag::Employer(id) => write!(f, "employer:{id}"),
            CacheTag::Applications => f.write_str("applications"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    pub backend: &'static str,
    pub total_entries: usize,
    pub tag_count: usize,
}

/// Storage backend behind [`crate::cache::ResponseCache`].
///
/// Values are opaque JSON payloads. Implementations must treat an expired
/// entry as absent.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> CacheResult<Option<Value>>;

    /// Stores `value`, replacing any previous entry and its tag registrations.
    async fn set(&self, key: &str, value: Value, ttl: Duration, tags: &[String])
        -> CacheResult<()>;

    /// Returns true when an entry was removed.
    async fn delete(&self, key: &str) -> CacheResult<bool>;

    /// Removes every key containing any of `patterns` as a substring.
    async fn clear_by_pattern(&self, patterns: &[String]) -> CacheResult<usize>;

    /// Removes every key registered under any of `tags`.
    async fn invalidate_tags(&self, tags: &[String]) -> CacheResult<usize>;

    async fn clear(&self) -> CacheResult<usize>;

    async fn stats(&self) -> CacheResult<CacheStats>;
}

/// Substring match used by pattern clearing. Empty patterns never match.
pub fn matches_any(key: &str, patterns: &[String]) -> bool {
    patterns
        .iter()
        .any(|p| !p.is_empty() && key.contains(p.as_str()))
}
