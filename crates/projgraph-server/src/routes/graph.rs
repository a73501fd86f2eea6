//! Project list and neighbourhood graph routes.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

use super::ApiResult;
use crate::state::AppState;
use projgraph_core::config::clamp_hops;
use projgraph_core::Error;
use projgraph_viz::GraphView;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/projects", get(list_projects))
        .route("/graph", get(get_graph))
}

/// GET /api/projects: names for the project selector.
async fn list_projects(State(state): State<Arc<AppState>>) -> ApiResult<Json<serde_json::Value>> {
    let projects = state.store.project_names().await?;
    Ok(Json(serde_json::json!({
        "total": projects.len(),
        "projects": projects,
    })))
}

#[derive(Deserialize)]
struct GraphQuery {
    project: Option<String>,
    /// Kept as text so a malformed value still gets a JSON error body.
    hops: Option<String>,
}

/// Parse the `hops` parameter. Numbers outside 1..=2 are clamped.
fn parse_hops(raw: Option<&str>, default: u8) -> Result<u8, Error> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(clamp_hops(default)),
        Some(text) => text
            .parse::<i64>()
            .map(|n| clamp_hops(n.clamp(0, i64::from(u8::MAX)) as u8))
            .map_err(|_| Error::Validation(format!("Invalid hops value \"{}\": use 1 or 2.", text))),
    }
}

/// GET /api/graph?project=<name>&hops=<1|2>: the drawable neighbourhood.
async fn get_graph(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GraphQuery>,
) -> ApiResult<Json<GraphView>> {
    let project = params
        .project
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .ok_or_else(|| Error::Validation("Choose a project first.".into()))?;
    let hops = parse_hops(params.hops.as_deref(), state.config.default_hops)?;

    let hood = state
        .store
        .neighborhood(&project, hops)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Project \"{}\" was not found.", project)))?;

    let view = projgraph_viz::build_view(&hood);
    info!(
        "Graph for {:?} ({} hops): {} neighbours",
        project, hops, view.summary.neighbors
    );
    Ok(Json(view))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hops() {
        assert_eq!(parse_hops(None, 2).unwrap(), 2);
        assert_eq!(parse_hops(Some(""), 1).unwrap(), 1);
        assert_eq!(parse_hops(Some(" 1 "), 2).unwrap(), 1);
        assert_eq!(parse_hops(Some("300"), 2).unwrap(), 2);
        assert_eq!(parse_hops(Some("-4"), 2).unwrap(), 1);
        assert!(matches!(parse_hops(Some("abc"), 2), Err(Error::Validation(_))));
    }
}
