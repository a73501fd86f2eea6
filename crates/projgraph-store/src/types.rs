//! Data types for nodes, relationships and traversal results.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use projgraph_core::{Error, Result};

pub const PROJECT_LABEL: &str = "Project";
pub const ORGANIZATION_LABEL: &str = "Organization";
pub const THEME_LABEL: &str = "Theme";

/// Node or relationship properties, ordered by key.
pub type PropertyMap = BTreeMap<String, serde_json::Value>;

/// A node as returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Store-assigned identity (Neo4j element id, or `n<index>` in memory).
    pub id: String,
    pub labels: Vec<String>,
    pub properties: PropertyMap,
}

impl GraphNode {
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// A property rendered as text. Strings are returned unquoted.
    pub fn property_text(&self, key: &str) -> Option<String> {
        match self.properties.get(key)? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Text shown for the node: `name`, `full_name`, `title`, `id`, then identity.
    pub fn display_name(&self) -> String {
        ["name", "full_name", "title", "id"]
            .iter()
            .filter_map(|key| self.property_text(key))
            .find(|text| !text.is_empty())
            .unwrap_or_else(|| self.id.clone())
    }
}

/// A directed, typed relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphRelationship {
    pub id: String,
    pub start: String,
    pub end: String,
    pub rel_type: String,
    #[serde(default)]
    pub properties: PropertyMap,
}

/// One traversal result: a reachable node and the relationships leading to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeighborRow {
    pub node: GraphNode,
    pub path: Vec<GraphRelationship>,
}

/// A project and everything within `hops` steps of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Neighborhood {
    pub center: GraphNode,
    pub hops: u8,
    pub rows: Vec<NeighborRow>,
}

impl Neighborhood {
    pub fn is_isolated(&self) -> bool {
        self.rows.iter().all(|row| row.path.is_empty())
    }
}

/// Merge a node on a single key property.
#[derive(Debug, Clone)]
pub struct NodeMerge {
    pub label: String,
    pub key: String,
    pub value: serde_json::Value,
    pub properties: PropertyMap,
}

impl NodeMerge {
    pub fn node_ref(&self) -> NodeRef {
        NodeRef {
            label: self.label.clone(),
            key: self.key.clone(),
            value: self.value.clone(),
        }
    }
}

/// Identifies an existing node by label and key property.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRef {
    pub label: String,
    pub key: String,
    pub value: serde_json::Value,
}

/// Merge a relationship `(from)-[:rel_type]->(to)`.
#[derive(Debug, Clone)]
pub struct RelationshipMerge {
    pub from: NodeRef,
    pub to: NodeRef,
    pub rel_type: String,
    pub properties: PropertyMap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeOutcome {
    Created,
    Matched,
}

/// Store-wide counts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreStats {
    pub backend: String,
    pub node_count: u64,
    pub relationship_count: u64,
    pub labels: BTreeMap<String, u64>,
    pub relationship_types: BTreeMap<String, u64>,
}

/// Labels, property keys and relationship types are spliced into Cypher
/// text, so they must be plain identifiers.
pub fn validate_identifier(kind: &str, name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(Error::Validation(format!("invalid {} name: {:?}", kind, name)))
    }
}
