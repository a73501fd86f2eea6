//! Node classification and styling buckets.

use serde::{Deserialize, Serialize};

use projgraph_store::{GraphNode, ORGANIZATION_LABEL, PROJECT_LABEL, THEME_LABEL};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Project,
    Organization,
    Theme,
    Other,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Project => write!(f, "project"),
            Self::Organization => write!(f, "organization"),
            Self::Theme => write!(f, "theme"),
            Self::Other => write!(f, "other"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeStyle {
    pub color: &'static str,
    pub size: u32,
}

/// The selected project is drawn larger and in a stronger colour.
pub const SELECTED_STYLE: NodeStyle = NodeStyle {
    color: "#d62728",
    size: 30,
};

impl NodeKind {
    pub fn style(self) -> NodeStyle {
        match self {
            Self::Project => NodeStyle {
                color: "#1f77b4",
                size: 22,
            },
            Self::Organization => NodeStyle {
                color: "#ff7f0e",
                size: 18,
            },
            Self::Theme => NodeStyle {
                color: "#2ca02c",
                size: 16,
            },
            Self::Other => NodeStyle {
                color: "#7f7f7f",
                size: 12,
            },
        }
    }
}

/// Decide how a node is drawn.
///
/// Labels win. Unlabelled (or unknown-label) nodes fall back to looking at
/// the serialised node: "organization"/"organisation" or "theme" anywhere in
/// it picks those buckets, then a `name` property means project-like.
pub fn classify(node: &GraphNode) -> NodeKind {
    if node.has_label(PROJECT_LABEL) {
        return NodeKind::Project;
    }
    if node.has_label(ORGANIZATION_LABEL) {
        return NodeKind::Organization;
    }
    if node.has_label(THEME_LABEL) {
        return NodeKind::Theme;
    }

    let text = serde_json::to_string(node)
        .unwrap_or_default()
        .to_lowercase();
    if text.contains("organization") || text.contains("organisation") {
        NodeKind::Organization
    } else if text.contains("theme") {
        NodeKind::Theme
    } else if node.properties.contains_key("name") {
        NodeKind::Project
    } else {
        NodeKind::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(labels: &[&str], props: serde_json::Value) -> GraphNode {
        GraphNode {
            id: "4:abc:1".into(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            properties: serde_json::from_value(props).unwrap(),
        }
    }

    #[test]
    fn test_labels_take_priority() {
        assert_eq!(classify(&node(&["Project"], json!({}))), NodeKind::Project);
        assert_eq!(
            classify(&node(&["Organization"], json!({"name": "GIZ"}))),
            NodeKind::Organization
        );
        assert_eq!(classify(&node(&["Theme"], json!({"name": "x"}))), NodeKind::Theme);
    }

    #[test]
    fn test_substring_heuristics() {
        assert_eq!(
            classify(&node(&["Partner"], json!({"kind": "Partner Organisation"}))),
            NodeKind::Organization
        );
        assert_eq!(
            classify(&node(&["Topic"], json!({"category": "theme", "name": "Water"}))),
            NodeKind::Theme
        );
    }

    #[test]
    fn test_name_implies_project_like() {
        assert_eq!(classify(&node(&["Initiative"], json!({"name": "Atlas"}))), NodeKind::Project);
        assert_eq!(classify(&node(&["Person"], json!({"full_name": "Ana"}))), NodeKind::Other);
    }

    #[test]
    fn test_styles_are_distinct() {
        let colors = [
            NodeKind::Project.style().color,
            NodeKind::Organization.style().color,
            NodeKind::Theme.style().color,
            NodeKind::Other.style().color,
            SELECTED_STYLE.color,
        ];
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
