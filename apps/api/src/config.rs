use std::time::Duration;

use anyhow::{bail, Context, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    Memory,
    Redis,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub cache_backend: CacheBackend,
    pub redis_url: Option<String>,
    /// TTL for list responses (job lists, employer grids, applications).
    pub cache_list_ttl: Duration,
    /// TTL for single-document responses.
    pub cache_detail_ttl: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let cache_backend = match optional_env("CACHE_BACKEND").as_deref() {
            None | Some("memory") => CacheBackend::Memory,
            Some("redis") => CacheBackend::Redis,
            Some(other) => bail!("CACHE_BACKEND must be 'memory' or 'redis', got '{other}'"),
        };
        let redis_url = optional_env("REDIS_URL");
        if cache_backend == CacheBackend::Redis && redis_url.is_none() {
            bail!("REDIS_URL is required when CACHE_BACKEND=redis");
        }

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            cache_backend,
            redis_url,
            cache_list_ttl: Duration::from_secs(parse_env("CACHE_LIST_TTL_SECS", 30)?),
            cache_detail_ttl: Duration::from_secs(parse_env("CACHE_DETAIL_TTL_SECS", 60)?),
            port: parse_env("PORT", 8080)?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
