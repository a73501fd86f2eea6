//! Health and store statistics routes.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use super::ApiResult;
use crate::state::AppState;
use projgraph_store::StoreStats;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(get_health))
        .route("/stats", get(get_stats))
}

/// GET /api/health: backend in use.
async fn get_health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "projgraph",
        "backend": state.store.backend(),
        "defaultHops": state.config.default_hops,
    }))
}

/// GET /api/stats: node counts per label, relationship counts per type.
async fn get_stats(State(state): State<Arc<AppState>>) -> ApiResult<Json<StoreStats>> {
    Ok(Json(state.store.stats().await?))
}
