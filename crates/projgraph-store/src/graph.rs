//! In-memory property graph using petgraph.
//!
//! Mirrors the Neo4j backend's semantics closely enough for tests and for
//! running the dashboard without a database: merge-on-key nodes, directed
//! typed relationships, and undirected 1..=2 hop traversal where a path
//! never reuses a relationship.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use parking_lot::RwLock;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::types::*;
use crate::GraphStore;
use projgraph_core::config::clamp_hops;
use projgraph_core::{Error, Result};

#[derive(Debug, Clone)]
struct StoredNode {
    labels: Vec<String>,
    properties: PropertyMap,
}

#[derive(Debug, Clone)]
struct StoredEdge {
    rel_type: String,
    properties: PropertyMap,
}

#[derive(Default)]
struct Inner {
    graph: DiGraph<StoredNode, StoredEdge>,
}

/// Graph store held entirely in process memory.
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Ascending `ORDER BY` order for property values: lists and maps, then
/// strings, booleans, numbers (compared numerically), with nulls last.
fn cypher_order(a: Option<&serde_json::Value>, b: Option<&serde_json::Value>) -> Ordering {
    use serde_json::Value;

    fn rank(v: Option<&Value>) -> u8 {
        match v {
            Some(Value::Array(_)) | Some(Value::Object(_)) => 0,
            Some(Value::String(_)) => 1,
            Some(Value::Bool(_)) => 2,
            Some(Value::Number(_)) => 3,
            Some(Value::Null) | None => 4,
        }
    }

    match (a, b) {
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => {
                let (x, y) = (x.as_f64().unwrap_or(f64::NAN), y.as_f64().unwrap_or(f64::NAN));
                x.total_cmp(&y)
            }
        },
        _ => rank(a)
            .cmp(&rank(b))
            .then_with(|| a.map(|v| v.to_string()).cmp(&b.map(|v| v.to_string()))),
    }
}

impl Inner {
    fn find(&self, label: &str, key: &str, value: &serde_json::Value) -> Vec<NodeIndex> {
        self.graph
            .node_indices()
            .filter(|&idx| {
                let node = &self.graph[idx];
                node.labels.iter().any(|l| l == label) && node.properties.get(key) == Some(value)
            })
            .collect()
    }

    fn to_graph_node(&self, idx: NodeIndex) -> GraphNode {
        let node = &self.graph[idx];
        GraphNode {
            id: node_id(idx),
            labels: node.labels.clone(),
            properties: node.properties.clone(),
        }
    }

    fn to_relationship(&self, edge: EdgeIndex) -> Option<GraphRelationship> {
        let (start, end) = self.graph.edge_endpoints(edge)?;
        let stored = &self.graph[edge];
        Some(GraphRelationship {
            id: format!("r{}", edge.index()),
            start: node_id(start),
            end: node_id(end),
            rel_type: stored.rel_type.clone(),
            properties: stored.properties.clone(),
        })
    }

    /// Relationships touching `idx` in either direction, with the node at
    /// the other end.
    fn incident(&self, idx: NodeIndex) -> Vec<(EdgeIndex, NodeIndex)> {
        let outgoing = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| (e.id(), e.target()));
        let incoming = self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .map(|e| (e.id(), e.source()));
        let mut edges: Vec<_> = outgoing.chain(incoming).collect();
        // Self-loops show up in both directions.
        edges.sort();
        edges.dedup();
        edges
    }

    /// Every path of 1..=`hops` distinct relationships leaving `start`.
    fn paths_from(&self, start: NodeIndex, hops: u8) -> Vec<(NodeIndex, Vec<EdgeIndex>)> {
        let mut paths = Vec::new();
        let mut frontier = vec![(start, Vec::<EdgeIndex>::new())];

        for _ in 0..hops {
            let mut next = Vec::new();
            for (node, path) in &frontier {
                for (edge, other) in self.incident(*node) {
                    if path.contains(&edge) {
                        continue;
                    }
                    let mut extended = path.clone();
                    extended.push(edge);
                    paths.push((other, extended.clone()));
                    next.push((other, extended));
                }
            }
            frontier = next;
        }
        paths
    }
}

fn node_id(idx: NodeIndex) -> String {
    format!("n{}", idx.index())
}

#[async_trait]
impl GraphStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn merge_node(&self, merge: &NodeMerge) -> Result<MergeOutcome> {
        validate_identifier("label", &merge.label)?;
        validate_identifier("property", &merge.key)?;

        let mut inner = self.inner.write();
        let matches = inner.find(&merge.label, &merge.key, &merge.value);

        let (targets, outcome) = if matches.is_empty() {
            let mut properties = PropertyMap::new();
            properties.insert(merge.key.clone(), merge.value.clone());
            let idx = inner.graph.add_node(StoredNode {
                labels: vec![merge.label.clone()],
                properties,
            });
            (vec![idx], MergeOutcome::Created)
        } else {
            (matches, MergeOutcome::Matched)
        };

        for idx in targets {
            let props = &mut inner.graph[idx].properties;
            for (key, value) in &merge.properties {
                // `SET n += {k: null}` removes the property.
                if value.is_null() {
                    props.remove(key);
                } else {
                    props.insert(key.clone(), value.clone());
                }
            }
        }
        Ok(outcome)
    }

    async fn merge_relationship(&self, merge: &RelationshipMerge) -> Result<MergeOutcome> {
        validate_identifier("relationship type", &merge.rel_type)?;

        let mut inner = self.inner.write();
        let from = inner.find(&merge.from.label, &merge.from.key, &merge.from.value);
        let to = inner.find(&merge.to.label, &merge.to.key, &merge.to.value);
        if from.is_empty() || to.is_empty() {
            return Err(Error::NotFound(format!(
                "{} endpoints {}={} / {}={}",
                merge.rel_type, merge.from.key, merge.from.value, merge.to.key, merge.to.value
            )));
        }

        let mut outcome = MergeOutcome::Matched;
        for &a in &from {
            for &b in &to {
                let existing = inner
                    .graph
                    .edges_connecting(a, b)
                    .find(|e| e.weight().rel_type == merge.rel_type)
                    .map(|e| e.id());
                let edge = match existing {
                    Some(edge) => edge,
                    None => {
                        outcome = MergeOutcome::Created;
                        inner.graph.add_edge(
                            a,
                            b,
                            StoredEdge {
                                rel_type: merge.rel_type.clone(),
                                properties: PropertyMap::new(),
                            },
                        )
                    }
                };
                let props = &mut inner.graph[edge].properties;
                for (key, value) in &merge.properties {
                    if value.is_null() {
                        props.remove(key);
                    } else {
                        props.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        Ok(outcome)
    }

    async fn project_names(&self) -> Result<Vec<String>> {
        let inner = self.inner.read();
        let mut names: Vec<String> = inner
            .graph
            .node_weights()
            .filter(|n| n.labels.iter().any(|l| l == PROJECT_LABEL))
            .filter_map(|n| match n.properties.get("name")? {
                serde_json::Value::Null => None,
                serde_json::Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            })
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    async fn neighborhood(&self, project_name: &str, hops: u8) -> Result<Option<Neighborhood>> {
        let hops = clamp_hops(hops);
        let inner = self.inner.read();

        let name = serde_json::Value::String(project_name.to_string());
        let mut candidates = inner.find(PROJECT_LABEL, "name", &name);
        // Smallest id wins when names collide, as in the Cypher query.
        candidates.sort_by(|&a, &b| {
            cypher_order(
                inner.graph[a].properties.get("id"),
                inner.graph[b].properties.get("id"),
            )
        });
        let Some(&center) = candidates.first() else {
            return Ok(None);
        };

        let rows = inner
            .paths_from(center, hops)
            .into_iter()
            .map(|(node, path)| NeighborRow {
                node: inner.to_graph_node(node),
                path: path
                    .into_iter()
                    .filter_map(|edge| inner.to_relationship(edge))
                    .collect(),
            })
            .collect();

        Ok(Some(Neighborhood {
            center: inner.to_graph_node(center),
            hops,
            rows,
        }))
    }

    async fn relationship_count(&self) -> Result<u64> {
        Ok(self.inner.read().graph.edge_count() as u64)
    }

    async fn stats(&self) -> Result<StoreStats> {
        let inner = self.inner.read();

        let mut labels: BTreeMap<String, u64> = BTreeMap::new();
        for node in inner.graph.node_weights() {
            for label in &node.labels {
                *labels.entry(label.clone()).or_default() += 1;
            }
        }

        let mut relationship_types: HashMap<String, u64> = HashMap::new();
        for edge in inner.graph.edge_weights() {
            *relationship_types.entry(edge.rel_type.clone()).or_default() += 1;
        }

        Ok(StoreStats {
            backend: self.backend().to_string(),
            node_count: inner.graph.node_count() as u64,
            relationship_count: inner.graph.edge_count() as u64,
            labels,
            relationship_types: relationship_types.into_iter().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: serde_json::Value) -> PropertyMap {
        serde_json::from_value(value).unwrap()
    }

    fn project(id: &str, name: &str) -> PropertyMap {
        props(json!({"id": id, "name": name}))
    }

    fn node_ref(label: &str, id: &str) -> NodeRef {
        NodeRef {
            label: label.into(),
            key: "id".into(),
            value: json!(id),
        }
    }

    async fn relate(store: &MemoryStore, from: NodeRef, rel_type: &str, to: NodeRef) {
        store
            .merge_relationship(&RelationshipMerge {
                from,
                to,
                rel_type: rel_type.into(),
                properties: PropertyMap::new(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent() {
        let store = MemoryStore::new();
        let first = store
            .upsert_project(props(json!({"id": "P1", "name": "Atlas", "status": "draft"})))
            .await
            .unwrap();
        let second = store
            .upsert_project(props(json!({"id": "P1", "status": "active", "budget": 10})))
            .await
            .unwrap();

        assert_eq!(first, MergeOutcome::Created);
        assert_eq!(second, MergeOutcome::Matched);

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.node_count, 1);

        let hood = store.neighborhood("Atlas", 2).await.unwrap().unwrap();
        assert_eq!(hood.center.property_text("status").as_deref(), Some("active"));
        assert_eq!(hood.center.property_text("budget").as_deref(), Some("10"));
    }

    #[tokio::test]
    async fn test_upsert_requires_id() {
        let store = MemoryStore::new();
        let result = store.upsert_project(props(json!({"name": "No id"}))).await;
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn test_project_names_sorted_distinct() {
        let store = MemoryStore::new();
        store.upsert_project(project("P2", "Beta")).await.unwrap();
        store.upsert_project(project("P1", "Alpha")).await.unwrap();
        store.upsert_project(project("P3", "Beta")).await.unwrap();
        store
            .upsert_project(props(json!({"id": "P4"})))
            .await
            .unwrap();

        assert_eq!(store.project_names().await.unwrap(), vec!["Alpha", "Beta"]);
    }

    #[tokio::test]
    async fn test_neighborhood_unknown_project() {
        let store = MemoryStore::new();
        store.upsert_project(project("P1", "Alpha")).await.unwrap();
        assert!(store.neighborhood("Nope", 2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_neighborhood_two_hops_both_directions() {
        let store = MemoryStore::new();
        store.upsert_project(project("P1", "Alpha")).await.unwrap();
        store.upsert_project(project("P2", "Beta")).await.unwrap();
        store.upsert_project(project("P3", "Gamma")).await.unwrap();
        store.upsert_project(project("P4", "Delta")).await.unwrap();
        // P2 -> P1 (incoming to Alpha), P2 -> P3, P3 -> P4 (three hops away)
        relate(&store, node_ref("Project", "P2"), "INFLUENCES", node_ref("Project", "P1")).await;
        relate(&store, node_ref("Project", "P2"), "RELATED_TO", node_ref("Project", "P3")).await;
        relate(&store, node_ref("Project", "P3"), "RELATED_TO", node_ref("Project", "P4")).await;

        let one = store.neighborhood("Alpha", 1).await.unwrap().unwrap();
        assert_eq!(one.rows.len(), 1);
        assert_eq!(one.rows[0].node.display_name(), "Beta");

        let two = store.neighborhood("Alpha", 2).await.unwrap().unwrap();
        let mut names: Vec<String> = two.rows.iter().map(|r| r.node.display_name()).collect();
        names.sort();
        assert_eq!(names, vec!["Beta", "Gamma"]);

        let gamma = two.rows.iter().find(|r| r.node.display_name() == "Gamma").unwrap();
        assert_eq!(gamma.path.len(), 2);
        assert_eq!(gamma.path[0].rel_type, "INFLUENCES");
        assert_eq!(gamma.path[1].rel_type, "RELATED_TO");
    }

    #[tokio::test]
    async fn test_duplicate_name_picks_smallest_id() {
        let store = MemoryStore::new();
        for id in [json!(10), json!(9), json!(11)] {
            store
                .upsert_project(props(json!({"id": id, "name": "Twin"})))
                .await
                .unwrap();
        }
        let hood = store.neighborhood("Twin", 1).await.unwrap().unwrap();
        assert_eq!(hood.center.properties.get("id"), Some(&json!(9)));

        let store = MemoryStore::new();
        for id in ["P2", "P10", "P1"] {
            store.upsert_project(project(id, "Twin")).await.unwrap();
        }
        let hood = store.neighborhood("Twin", 1).await.unwrap().unwrap();
        assert_eq!(hood.center.property_text("id").as_deref(), Some("P1"));
    }

    #[test]
    fn test_cypher_order() {
        let (a, b) = (json!(9), json!(10));
        assert_eq!(cypher_order(Some(&a), Some(&b)), Ordering::Less);
        let (a, b) = (json!(2.5), json!(2));
        assert_eq!(cypher_order(Some(&a), Some(&b)), Ordering::Greater);
        let (a, b) = (json!("z"), json!(1));
        assert_eq!(cypher_order(Some(&a), Some(&b)), Ordering::Less);
        let a = json!(1);
        assert_eq!(cypher_order(Some(&a), None), Ordering::Less);
    }

    #[tokio::test]
    async fn test_hops_clamped() {
        let store = MemoryStore::new();
        store.upsert_project(project("P1", "Alpha")).await.unwrap();
        let hood = store.neighborhood("Alpha", 9).await.unwrap().unwrap();
        assert_eq!(hood.hops, 2);
        assert!(hood.is_isolated());
    }

    #[tokio::test]
    async fn test_merge_relationship_idempotent() {
        let store = MemoryStore::new();
        store.upsert_project(project("P1", "Alpha")).await.unwrap();
        store.upsert_project(project("P2", "Beta")).await.unwrap();

        let merge = RelationshipMerge {
            from: node_ref("Project", "P1"),
            to: node_ref("Project", "P2"),
            rel_type: "RELATED_TO".into(),
            properties: props(json!({"since": 2021})),
        };
        assert_eq!(store.merge_relationship(&merge).await.unwrap(), MergeOutcome::Created);
        assert_eq!(store.merge_relationship(&merge).await.unwrap(), MergeOutcome::Matched);
        assert_eq!(store.relationship_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_merge_relationship_missing_endpoint() {
        let store = MemoryStore::new();
        store.upsert_project(project("P1", "Alpha")).await.unwrap();
        let result = store
            .merge_relationship(&RelationshipMerge {
                from: node_ref("Project", "P1"),
                to: node_ref("Project", "P9"),
                rel_type: "RELATED_TO".into(),
                properties: PropertyMap::new(),
            })
            .await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_stats_counts() {
        let store = MemoryStore::new();
        store.upsert_project(project("P1", "Alpha")).await.unwrap();
        store
            .merge_node(&NodeMerge {
                label: "Organization".into(),
                key: "id".into(),
                value: json!("O1"),
                properties: props(json!({"name": "GIZ"})),
            })
            .await
            .unwrap();
        relate(&store, node_ref("Project", "P1"), "EXECUTED_BY", node_ref("Organization", "O1")).await;

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.backend, "memory");
        assert_eq!(stats.node_count, 2);
        assert_eq!(stats.labels.get("Project"), Some(&1));
        assert_eq!(stats.labels.get("Organization"), Some(&1));
        assert_eq!(stats.relationship_types.get("EXECUTED_BY"), Some(&1));
    }
}
