//! Neighbourhood → node-link graph.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::style::{classify, NodeKind, SELECTED_STYLE};
use projgraph_core::{Error, Result};
use projgraph_store::{GraphNode, Neighborhood};

/// A node as handed to the vis-network renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisNode {
    pub id: String,
    pub label: String,
    /// Hover text.
    pub title: String,
    pub color: String,
    pub size: u32,
    pub group: NodeKind,
    pub selected: bool,
}

/// A directed edge labelled with the relationship type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisEdge {
    pub id: String,
    pub from: String,
    pub to: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisGraph {
    pub nodes: Vec<VisNode>,
    pub edges: Vec<VisEdge>,
}

impl VisGraph {
    pub fn node(&self, id: &str) -> Option<&VisNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

fn tooltip(node: &GraphNode, kind: NodeKind) -> String {
    if kind == NodeKind::Project {
        if let Some(status) = node.property_text("status") {
            return status;
        }
    }
    node.properties
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| match value {
            serde_json::Value::String(s) => format!("{}: {}", key, s),
            other => format!("{}: {}", key, other),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn to_vis_node(node: &GraphNode, selected: bool) -> VisNode {
    let kind = classify(node);
    let style = if selected { SELECTED_STYLE } else { kind.style() };
    VisNode {
        id: node.id.clone(),
        label: node.display_name(),
        title: tooltip(node, kind),
        color: style.color.to_string(),
        size: style.size,
        group: kind,
        selected,
    }
}

/// Build the drawable graph for a neighbourhood.
///
/// Nodes are deduplicated by identity with the selected project first;
/// edges are deduplicated by relationship identity. A relationship whose
/// endpoint is not among the returned nodes is an error.
pub fn build_vis_graph(hood: &Neighborhood) -> Result<VisGraph> {
    let mut graph = VisGraph::default();
    let mut seen_nodes = HashSet::new();
    let mut seen_edges = HashSet::new();

    seen_nodes.insert(hood.center.id.clone());
    graph.nodes.push(to_vis_node(&hood.center, true));

    for row in &hood.rows {
        if seen_nodes.insert(row.node.id.clone()) {
            graph.nodes.push(to_vis_node(&row.node, false));
        }
    }

    for rel in hood.rows.iter().flat_map(|row| &row.path) {
        if !seen_edges.insert(rel.id.clone()) {
            continue;
        }
        for endpoint in [&rel.start, &rel.end] {
            if !seen_nodes.contains(endpoint) {
                return Err(Error::Visualization(format!(
                    "relationship {} ({}) points at node {} outside the result",
                    rel.id, rel.rel_type, endpoint
                )));
            }
        }
        graph.edges.push(VisEdge {
            id: rel.id.clone(),
            from: rel.start.clone(),
            to: rel.end.clone(),
            label: rel.rel_type.clone(),
        });
    }

    tracing::debug!(
        "Built graph for {}: {} nodes, {} edges",
        hood.center.display_name(),
        graph.nodes.len(),
        graph.edges.len()
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use projgraph_store::{GraphRelationship, NeighborRow, PropertyMap};
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

    fn center() -> GraphNode {
        node("p", "Project", json!({"name": "Atlas", "status": "active"}))
    }

    #[test]
    fn test_isolated_project_is_single_node() {
        let hood = Neighborhood {
            center: center(),
            hops: 2,
            rows: vec![],
        };
        let graph = build_vis_graph(&hood).unwrap();
        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.edges.is_empty());
        assert!(graph.nodes[0].selected);
        assert_eq!(graph.nodes[0].title, "active");
    }

    #[test]
    fn test_dedup_nodes_and_edges() {
        let org = node("o", "Organization", json!({"full_name": "Agency"}));
        let theme = node("t", "Theme", json!({"title": "Water"}));
        let hood = Neighborhood {
            center: center(),
            hops: 2,
            rows: vec![
                NeighborRow {
                    node: org.clone(),
                    path: vec![rel("r1", "p", "o", "EXECUTED_BY")],
                },
                NeighborRow {
                    node: theme.clone(),
                    path: vec![rel("r1", "p", "o", "EXECUTED_BY"), rel("r2", "o", "t", "ADDRESSES")],
                },
                // Same theme again through a second relationship.
                NeighborRow {
                    node: theme,
                    path: vec![rel("r3", "p", "t", "ADDRESSES")],
                },
                // Back to the centre over two relationships.
                NeighborRow {
                    node: center(),
                    path: vec![rel("r3", "p", "t", "ADDRESSES"), rel("r2", "o", "t", "ADDRESSES")],
                },
            ],
        };

        let graph = build_vis_graph(&hood).unwrap();
        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(graph.edges.len(), 3);
        assert_eq!(graph.nodes[0].id, "p");

        let org_node = graph.node("o").unwrap();
        assert_eq!(org_node.label, "Agency");
        assert_eq!(org_node.group, NodeKind::Organization);
        assert!(org_node.title.contains("full_name: Agency"));

        let edge = graph.edges.iter().find(|e| e.id == "r2").unwrap();
        assert_eq!((edge.from.as_str(), edge.to.as_str()), ("o", "t"));
        assert_eq!(edge.label, "ADDRESSES");
    }

    #[test]
    fn test_n_neighbors_give_n_plus_one_nodes() {
        let rows: Vec<NeighborRow> = (0..5)
            .map(|i| NeighborRow {
                node: node(&format!("n{i}"), "Project", json!({"name": format!("P{i}")})),
                path: vec![rel(&format!("r{i}"), "p", &format!("n{i}"), "RELATED_TO")],
            })
            .collect();
        let hood = Neighborhood {
            center: center(),
            hops: 1,
            rows,
        };
        let graph = build_vis_graph(&hood).unwrap();
        assert_eq!(graph.nodes.len(), 6);
        assert!(graph.edges.len() >= 5);
    }

    #[test]
    fn test_dangling_relationship_is_error() {
        let hood = Neighborhood {
            center: center(),
            hops: 2,
            rows: vec![NeighborRow {
                node: node("o", "Organization", json!({})),
                path: vec![rel("r1", "p", "ghost", "EXECUTED_BY")],
            }],
        };
        assert!(matches!(build_vis_graph(&hood), Err(Error::Visualization(_))));
    }
}
