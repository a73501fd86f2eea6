//! Metric values and the raw traversal table shown under the graph.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::mapping::VisGraph;
use crate::style::classify;
use projgraph_store::{GraphRelationship, Neighborhood};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub project: String,
    pub status: Option<String>,
    pub start_date: Option<String>,
    pub budget: Option<serde_json::Value>,
    /// Distinct nodes reachable from the project, the project excluded.
    pub neighbors: usize,
    pub nodes: usize,
    pub edges: usize,
    pub relationship_types: BTreeMap<String, usize>,
    pub kinds: BTreeMap<String, usize>,
}

/// Metric widgets for a neighbourhood. `graph` is `None` when building the
/// drawable graph failed; counts then come from the raw rows.
pub fn summarize(hood: &Neighborhood, graph: Option<&VisGraph>) -> Summary {
    let center = &hood.center;

    let mut node_kinds: HashMap<&str, String> = HashMap::new();
    node_kinds.insert(center.id.as_str(), classify(center).to_string());
    for row in &hood.rows {
        node_kinds
            .entry(row.node.id.as_str())
            .or_insert_with(|| classify(&row.node).to_string());
    }

    let mut relationships: HashMap<&str, &GraphRelationship> = HashMap::new();
    for rel in hood.rows.iter().flat_map(|row| &row.path) {
        relationships.entry(rel.id.as_str()).or_insert(rel);
    }

    let mut relationship_types = BTreeMap::new();
    for rel in relationships.values() {
        *relationship_types.entry(rel.rel_type.clone()).or_insert(0) += 1;
    }

    let mut kinds = BTreeMap::new();
    for kind in node_kinds.values() {
        *kinds.entry(kind.clone()).or_insert(0) += 1;
    }

    let (nodes, edges) = match graph {
        Some(g) => (g.nodes.len(), g.edges.len()),
        None => (node_kinds.len(), relationships.len()),
    };

    Summary {
        project: center.display_name(),
        status: center.property_text("status"),
        start_date: center.property_text("start_date"),
        budget: center.properties.get("budget").filter(|v| !v.is_null()).cloned(),
        neighbors: node_kinds.len() - 1,
        nodes,
        edges,
        relationship_types,
        kinds,
    }
}

/// One traversal result in table form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub node: String,
    pub kind: String,
    pub labels: String,
    pub hops: usize,
    pub path: String,
}

/// The tabular fallback: one line per (neighbour, path) result.
pub fn raw_rows(hood: &Neighborhood) -> Vec<RawRow> {
    let mut names: HashMap<&str, String> = HashMap::new();
    names.insert(hood.center.id.as_str(), hood.center.display_name());
    for row in &hood.rows {
        names
            .entry(row.node.id.as_str())
            .or_insert_with(|| row.node.display_name());
    }
    let name_of = |id: &str| names.get(id).cloned().unwrap_or_else(|| id.to_string());

    hood.rows
        .iter()
        .map(|row| {
            let mut current = hood.center.id.clone();
            let mut path = name_of(current.as_str());
            for rel in &row.path {
                let (arrow, next) = if rel.start == current {
                    (format!(" -[{}]-> ", rel.rel_type), rel.end.clone())
                } else {
                    (format!(" <-[{}]- ", rel.rel_type), rel.start.clone())
                };
                path.push_str(&arrow);
                path.push_str(&name_of(next.as_str()));
                current = next;
            }

            RawRow {
                node: row.node.display_name(),
                kind: classify(&row.node).to_string(),
                labels: row.node.labels.join(", "),
                hops: row.path.len(),
                path,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use projgraph_store::{GraphNode, NeighborRow, PropertyMap};
    use serde_json::json;

    fn node(id: &str, label: &str, props: serde_json::Value) -> GraphNode {
        GraphNode {
            id: id.into(),
            labels: vec![label.into()],
            properties: serde_json::from_value(props).unwrap(),
        }
    }

    fn rel(id: &str, start: &str, end: &str, rel_type: &str) -> GraphRelationship {
        GraphRelationship {
            id: id.into(),
            start: start.into(),
            end: end.into(),
            rel_type: rel_type.into(),
            properties: PropertyMap::new(),
        }
    }

    fn sample() -> Neighborhood {
        Neighborhood {
            center: node(
                "p",
                "Project",
                json!({"name": "Atlas", "status": "active", "start_date": "2022-03-01", "budget": 1000}),
            ),
            hops: 2,
            rows: vec![
                NeighborRow {
                    node: node("q", "Project", json!({"name": "Beta"})),
                    path: vec![rel("r1", "q", "p", "INFLUENCES")],
                },
                NeighborRow {
                    node: node("o", "Organization", json!({"full_name": "Agency"})),
                    path: vec![rel("r1", "q", "p", "INFLUENCES"), rel("r2", "q", "o", "EXECUTED_BY")],
                },
            ],
        }
    }

    #[test]
    fn test_summarize_counts() {
        let summary = summarize(&sample(), None);
        assert_eq!(summary.project, "Atlas");
        assert_eq!(summary.status.as_deref(), Some("active"));
        assert_eq!(summary.start_date.as_deref(), Some("2022-03-01"));
        assert_eq!(summary.budget, Some(json!(1000)));
        assert_eq!(summary.neighbors, 2);
        assert_eq!(summary.nodes, 3);
        assert_eq!(summary.edges, 2);
        assert_eq!(summary.relationship_types.get("INFLUENCES"), Some(&1));
        assert_eq!(summary.kinds.get("project"), Some(&2));
        assert_eq!(summary.kinds.get("organization"), Some(&1));
    }

    #[test]
    fn test_raw_rows_render_direction() {
        let rows = raw_rows(&sample());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].path, "Atlas <-[INFLUENCES]- Beta");
        assert_eq!(rows[1].path, "Atlas <-[INFLUENCES]- Beta -[EXECUTED_BY]-> Agency");
        assert_eq!(rows[1].hops, 2);
        assert_eq!(rows[1].kind, "organization");
        assert_eq!(rows[1].labels, "Organization");
    }
}
