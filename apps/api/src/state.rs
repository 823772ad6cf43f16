use sqlx::PgPool;

use crate::cache::ResponseCache;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Response cache; memory or Redis backed depending on `CACHE_BACKEND`.
    pub cache: ResponseCache,
    pub config: Config,
}
