mod cache;
mod config;
mod db;
mod employment;
mod errors;
mod interview;
mod jobs;
mod models;
mod profile;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cache::{RedisStore, ResponseCache};
use crate::config::{CacheBackend, Config};
use crate::db::create_pool;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Portal API v{}", env!("CARGO_PKG_VERSION"));

    let db = create_pool(&config.database_url).await?;
    let cache = build_cache(&config).await;

    let state = AppState {
        db,
        cache,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Redis when configured and reachable, otherwise the in-process store.
async fn build_cache(config: &Config) -> ResponseCache {
    match (config.cache_backend, config.redis_url.as_deref()) {
        (CacheBackend::Redis, Some(url)) => match RedisStore::connect(url).await {
            Ok(store) => ResponseCache::new(Arc::new(store)),
            Err(e) => {
                warn!("Redis cache unavailable ({e}); falling back to in-memory cache");
                ResponseCache::in_memory()
            }
        },
        _ => {
            info!("Using in-memory response cache");
            ResponseCache::in_memory()
        }
    }
}
