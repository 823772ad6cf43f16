use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::cache::CacheStats;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ClearPatternsRequest {
    pub patterns: Vec<String>,
}

#[derive(Serialize)]
pub struct ClearedResponse {
    pub cleared: usize,
}

/// GET /api/v1/admin/cache/stats
pub async fn handle_cache_stats(State(state): State<AppState>) -> Json<Option<CacheStats>> {
    Json(state.cache.cache_stats().await)
}

/// POST /api/v1/admin/cache/clear
pub async fn handle_clear_patterns(
    State(state): State<AppState>,
    Json(req): Json<ClearPatternsRequest>,
) -> Result<Json<ClearedResponse>, AppError> {
    let patterns: Vec<&str> = req
        .patterns
        .iter()
        .map(|p| p.as_str())
        .filter(|p| !p.is_empty())
        .collect();
    if patterns.is_empty() {
        return Err(AppError::Validation(
            "patterns must contain at least one non-empty substring".to_string(),
        ));
    }
    let cleared = state.cache.clear_by_pattern(&patterns).await;
    Ok(Json(ClearedResponse { cleared }))
}

/// DELETE /api/v1/admin/cache
pub async fn handle_clear_all(State(state): State<AppState>) -> Json<ClearedResponse> {
    Json(ClearedResponse {
        cleared: state.cache.clear_all_caches().await,
    })
}
