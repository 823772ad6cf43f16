//! Redis cache backend for multi-instance deployments.
//!
//! Layout:
//! - `portal:cache:<key>` holds the JSON payload with a server-side `EX` TTL
//! - `portal:tag:<tag>` is a set of full cache keys written under that tag
//!
//! Pattern clears use `SCAN`, never `KEYS`. Each tag set expires no earlier
//! than the longest-lived entry written under it (`EXPIRE NX` then
//! `EXPIRE GT`, Redis 7+), and may briefly reference keys Redis already
//! expired.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::cache::store::{CacheResult, CacheStats, CacheStore};

const KEY_PREFIX: &str = "portal:cache:";
const TAG_PREFIX: &str = "portal:tag:";
const SCAN_BATCH: usize = 200;

#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    pub async fn connect(redis_url: &str) -> CacheResult<Self> {
        let client = redis::Client::open(redis_url)?;
        let conn = client.get_connection_manager().await?;
        info!("Redis cache backend connected");
        Ok(Self { conn })
    }

    async fn scan(&self, pattern: &str) -> CacheResult<Vec<String>> {
        let mut conn = self.conn.clone();
        let mut cursor: u64 = 0;
        let mut keys = Vec::new();
        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await?;
            keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }
        // SCAN may return a key more than once.
        keys.sort();
        keys.dedup();
        Ok(keys)
    }

    async fn delete_keys(&self, keys: &[String]) -> CacheResult<usize> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut conn = self.conn.clone();
        let removed: usize = redis::cmd("DEL").arg(keys).query_async(&mut conn).await?;
        Ok(removed)
    }
}

fn cache_key(key: &str) -> String {
    format!("{KEY_PREFIX}{key}")
}

fn tag_key(tag: &str) -> String {
    format!("{TAG_PREFIX}{tag}")
}

/// Stores one entry and registers it under its tags in a single transaction.
fn write_pipeline(
    full_key: &str,
    payload: String,
    seconds: u64,
    tags: &[String],
) -> redis::Pipeline {
    let mut pipe = redis::pipe();
    pipe.atomic()
        .cmd("SET")
        .arg(full_key)
        .arg(payload)
        .arg("EX")
        .arg(seconds)
        .ignore();
    for tag in tags {
        let set_key = tag_key(tag);
        pipe.cmd("SADD").arg(&set_key).arg(full_key).ignore();
        pipe.cmd("EXPIRE").arg(&set_key).arg(seconds).arg("NX").ignore();
        pipe.cmd("EXPIRE").arg(&set_key).arg(seconds).arg("GT").ignore();
    }
    pipe
}

/// Reads and drops a tag set in one transaction, so a key tagged afterwards
/// lands in a fresh set instead of being lost.
fn drain_tag_pipeline(set_key: &str) -> redis::Pipeline {
    let mut pipe = redis::pipe();
    pipe.atomic()
        .cmd("SMEMBERS")
        .arg(set_key)
        .cmd("DEL")
        .arg(set_key)
        .ignore();
    pipe
}

/// Escapes Redis glob metacharacters so a pattern matches literally.
fn escape_glob(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl CacheStore for RedisStore {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> CacheResult<Option<Value>> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = redis::cmd("GET")
            .arg(cache_key(key))
            .query_async(&mut conn)
            .await?;
        match raw {
            Some(payload) => {
                debug!("Cache hit");
                Ok(Some(serde_json::from_str(&payload)?))
            }
            None => {
                debug!("Cache miss");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, value, tags))]
    async fn set(
        &self,
        key: &str,
        value: Value,
        ttl: Duration,
        tags: &[String],
    ) -> CacheResult<()> {
        let full_key = cache_key(key);
        let payload = serde_json::to_string(&value)?;
        // EX rejects 0; sub-second TTLs round up to one second.
        let seconds = ttl.as_secs().max(1);

        let mut conn = self.conn.clone();
        let _: () = write_pipeline(&full_key, payload, seconds, tags)
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<bool> {
        Ok(self.delete_keys(&[cache_key(key)]).await? > 0)
    }

    async fn clear_by_pattern(&self, patterns: &[String]) -> CacheResult<usize> {
        let mut doomed = Vec::new();
        for pattern in patterns.iter().filter(|p| !p.is_empty()) {
            let glob = format!("{}*{}*", escape_glob(KEY_PREFIX), escape_glob(pattern));
            doomed.extend(self.scan(&glob).await?);
        }
        doomed.sort();
        doomed.dedup();
        self.delete_keys(&doomed).await
    }

    async fn invalidate_tags(&self, tags: &[String]) -> CacheResult<usize> {
        let mut conn = self.conn.clone();
        let mut removed = 0;
        for tag in tags {
            let (members,): (Vec<String>,) = drain_tag_pipeline(&tag_key(tag))
                .query_async(&mut conn)
                .await?;
            removed += self.delete_keys(&members).await?;
        }
        Ok(removed)
    }

    async fn clear(&self) -> CacheResult<usize> {
        let entries = self.scan(&format!("{}*", escape_glob(KEY_PREFIX))).await?;
        let tag_sets = self.scan(&format!("{}*", escape_glob(TAG_PREFIX))).await?;
        let removed = self.delete_keys(&entries).await?;
        self.delete_keys(&tag_sets).await?;
        Ok(removed)
    }

    async fn stats(&self) -> CacheResult<CacheStats> {
        let entries = self.scan(&format!("{}*", escape_glob(KEY_PREFIX))).await?;
        let tag_sets = self.scan(&format!("{}*", escape_glob(TAG_PREFIX))).await?;
        Ok(CacheStats {
            backend: "redis",
            total_entries: entries.len(),
            tag_count: tag_sets.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_glob_escapes_metacharacters() {
        assert_eq!(escape_glob("jobs_"), "jobs_");
        assert_eq!(escape_glob("a*b?c"), "a\\*b\\?c");
        assert_eq!(escape_glob("[x]"), "\\[x\\]");
        assert_eq!(escape_glob("back\\slash"), "back\\\\slash");
    }

    fn packed(pipe: &redis::Pipeline) -> String {
        String::from_utf8_lossy(&pipe.get_packed_pipeline()).into_owned()
    }

    #[test]
    fn test_write_expires_tag_sets_with_entry() {
        let tags = vec!["jobs".to_string(), "job:1".to_string()];
        let wire = packed(&write_pipeline("portal:cache:job_1", "{}".to_string(), 60, &tags));

        assert!(wire.starts_with("*1\r\n$5\r\nMULTI"));
        assert!(wire.contains("EXEC"));
        for set_key in ["portal:tag:jobs", "portal:tag:job:1"] {
            for mode in ["NX", "GT"] {
                let expire = format!(
                    "$6\r\nEXPIRE\r\n${}\r\n{set_key}\r\n$2\r\n60\r\n$2\r\n{mode}",
                    set_key.len()
                );
                assert!(wire.contains(&expire), "no EXPIRE {mode} for {set_key}");
            }
        }
    }

    #[test]
    fn test_tag_drain_is_one_transaction() {
        let wire = packed(&drain_tag_pipeline("portal:tag:jobs"));
        let multi = wire.find("MULTI").unwrap();
        let members = wire.find("SMEMBERS").unwrap();
        let del = wire.find("DEL").unwrap();
        let exec = wire.find("EXEC").unwrap();
        assert!(multi < members && members < del && del < exec);
    }

    #[test]
    fn test_key_prefixes() {
        assert_eq!(cache_key("job_1"), "portal:cache:job_1");
        assert_eq!(tag_key("jobs"), "portal:tag:jobs");
    }
}
