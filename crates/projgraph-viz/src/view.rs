//! Everything the dashboard shows for one selected project.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::mapping::{build_vis_graph, VisGraph};
use crate::summary::{raw_rows, summarize, RawRow, Summary};
use projgraph_store::Neighborhood;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphView {
    pub project: String,
    pub hops: u8,
    /// `None` when the graph could not be built; `rows` are still filled.
    pub graph: Option<VisGraph>,
    pub summary: Summary,
    pub rows: Vec<RawRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Build the full view. A failure while building the drawable graph is
/// reported in `error` instead of failing the view.
pub fn build_view(hood: &Neighborhood) -> GraphView {
    let project = hood.center.display_name();

    let (graph, error) = match build_vis_graph(hood) {
        Ok(graph) => (Some(graph), None),
        Err(e) => {
            warn!("Could not build graph for {}: {}", project, e);
            (None, Some(format!("Could not draw the graph: {}", e)))
        }
    };

    let notice = hood
        .is_isolated()
        .then(|| format!("Project \"{}\" has no relationships yet.", project));

    GraphView {
        summary: summarize(hood, graph.as_ref()),
        rows: raw_rows(hood),
        project,
        hops: hood.hops,
        graph,
        notice,
        error,
    }
}
