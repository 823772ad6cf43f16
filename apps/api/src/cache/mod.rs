// Response cache: TTL-bound JSON payloads with tag-based invalidation.
// Handlers only see ResponseCache; backends sit behind the CacheStore trait.

pub mod invalidation;
pub mod keys;
pub mod memory;
pub mod redis_store;
pub mod service;
pub mod store;

pub use redis_store::RedisStore;
pub use service::ResponseCache;
pub use store::{CacheStats, CacheTag};
