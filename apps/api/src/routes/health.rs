use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version and cache backend.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let cache = state.cache.cache_stats().await.map(|s| s.backend);
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "portal-api",
        "cache": cache
    }))
}
