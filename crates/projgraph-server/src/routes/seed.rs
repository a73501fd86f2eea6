//! Demo data seeding route.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use super::ApiResult;
use crate::state::AppState;
use projgraph_ingest::SeedReport;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/seed", post(seed))
}

/// POST /api/seed: merge the demo dataset. Safe to repeat.
async fn seed(State(state): State<Arc<AppState>>) -> ApiResult<Json<SeedReport>> {
    let report = projgraph_ingest::seed_demo_data(state.store.as_ref()).await?;
    Ok(Json(report))
}
