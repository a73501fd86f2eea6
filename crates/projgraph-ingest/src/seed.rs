//! Demo data: a handful of projects, organisations and themes wired
//! together, for trying the dashboard on an empty database.
//!
//! Every demo node carries a `demo_id`. Demo projects are merged on `id`
//! like loaded ones, so a project already loaded under a demo id is reused;
//! other demo nodes are merged on `demo_id`. Demo relationships are merged
//! on (start, type, end), so seeding any number of times leaves exactly one
//! copy of each demo entity.

use serde::Serialize;
use tracing::info;

use projgraph_core::Result;
use projgraph_store::{
    GraphStore, MergeOutcome, NodeMerge, NodeRef, PropertyMap, RelationshipMerge,
    ORGANIZATION_LABEL, PROJECT_LABEL, THEME_LABEL,
};

pub const DEMO_KEY: &str = "demo_id";

struct DemoNode {
    label: &'static str,
    demo_id: &'static str,
    properties: &'static [(&'static str, DemoValue)],
}

#[derive(Clone, Copy)]
enum DemoValue {
    Text(&'static str),
    Number(i64),
}

impl DemoValue {
    fn to_json(self) -> serde_json::Value {
        match self {
            Self::Text(s) => serde_json::Value::from(s),
            Self::Number(n) => serde_json::Value::from(n),
        }
    }
}

struct DemoRelationship {
    from: &'static str,
    rel_type: &'static str,
    to: &'static str,
    description: &'static str,
}

use DemoValue::{Number, Text};

const DEMO_NODES: &[DemoNode] = &[
    DemoNode {
        label: PROJECT_LABEL,
        demo_id: "demo-project-atlas",
        properties: &[
            ("id", Text("demo-project-atlas")),
            ("name", Text("Atlas Digital Services")),
            ("status", Text("active")),
            ("start_date", Text("2022-03-01")),
            ("budget", Number(1_200_000)),
        ],
    },
    DemoNode {
        label: PROJECT_LABEL,
        demo_id: "demo-project-observatory",
        properties: &[
            ("id", Text("demo-project-observatory")),
            ("name", Text("Urban Data Observatory")),
            ("status", Text("planned")),
            ("start_date", Text("2024-07-15")),
            ("budget", Number(450_000)),
        ],
    },
    DemoNode {
        label: PROJECT_LABEL,
        demo_id: "demo-project-climate",
        properties: &[
            ("id", Text("demo-project-climate")),
            ("name", Text("Climate Risk Monitor")),
            ("status", Text("completed")),
            ("start_date", Text("2020-09-10")),
            ("budget", Number(800_000)),
        ],
    },
    DemoNode {
        label: ORGANIZATION_LABEL,
        demo_id: "demo-org-cooperation",
        properties: &[
            ("full_name", Text("Development Cooperation Agency")),
            ("country", Text("DE")),
        ],
    },
    DemoNode {
        label: ORGANIZATION_LABEL,
        demo_id: "demo-org-ministry",
        properties: &[
            ("full_name", Text("Ministry of Environment")),
            ("country", Text("BR")),
        ],
    },
    DemoNode {
        label: THEME_LABEL,
        demo_id: "demo-theme-climate",
        properties: &[("title", Text("Climate Action"))],
    },
    DemoNode {
        label: THEME_LABEL,
        demo_id: "demo-theme-govtech",
        properties: &[("title", Text("Digital Government"))],
    },
];

const DEMO_RELATIONSHIPS: &[DemoRelationship] = &[
    DemoRelationship {
        from: "demo-project-atlas",
        rel_type: "RELATED_TO",
        to: "demo-project-observatory",
        description: "shares the open data platform",
    },
    DemoRelationship {
        from: "demo-project-climate",
        rel_type: "INFLUENCES",
        to: "demo-project-observatory",
        description: "risk indicators feed the observatory",
    },
    DemoRelationship {
        from: "demo-project-atlas",
        rel_type: "EXECUTED_BY",
        to: "demo-org-cooperation",
        description: "implementing partner",
    },
    DemoRelationship {
        from: "demo-project-climate",
        rel_type: "EXECUTED_BY",
        to: "demo-org-ministry",
        description: "lead agency",
    },
    DemoRelationship {
        from: "demo-project-atlas",
        rel_type: "ADDRESSES",
        to: "demo-theme-govtech",
        description: "primary theme",
    },
    DemoRelationship {
        from: "demo-project-climate",
        rel_type: "ADDRESSES",
        to: "demo-theme-climate",
        description: "primary theme",
    },
];

/// What a seeding run changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub nodes_created: usize,
    pub nodes_existing: usize,
    pub relationships_created: usize,
    pub relationships_existing: usize,
}

fn label_of(demo_id: &str) -> &'static str {
    DEMO_NODES
        .iter()
        .find(|n| n.demo_id == demo_id)
        .map(|n| n.label)
        .unwrap_or(PROJECT_LABEL)
}

/// Property a demo node is merged on. Projects keep `id` unique.
fn merge_key(label: &str) -> &'static str {
    if label == PROJECT_LABEL {
        "id"
    } else {
        DEMO_KEY
    }
}

fn demo_ref(demo_id: &str) -> NodeRef {
    let label = label_of(demo_id);
    NodeRef {
        label: label.to_string(),
        key: merge_key(label).to_string(),
        value: serde_json::Value::from(demo_id),
    }
}

/// Merge the demo nodes and relationships into `store`.
pub async fn seed_demo_data(store: &dyn GraphStore) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    for node in DEMO_NODES {
        let mut properties: PropertyMap = node
            .properties
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_json()))
            .collect();
        properties.insert(DEMO_KEY.to_string(), serde_json::Value::from(node.demo_id));

        let outcome = store
            .merge_node(&NodeMerge {
                label: node.label.to_string(),
                key: merge_key(node.label).to_string(),
                value: serde_json::Value::from(node.demo_id),
                properties,
            })
            .await?;
        match outcome {
            MergeOutcome::Created => report.nodes_created += 1,
            MergeOutcome::Matched => report.nodes_existing += 1,
        }
    }

    for rel in DEMO_RELATIONSHIPS {
        let mut properties = PropertyMap::new();
        properties.insert("description".into(), serde_json::Value::from(rel.description));

        let outcome = store
            .merge_relationship(&RelationshipMerge {
                from: demo_ref(rel.from),
                to: demo_ref(rel.to),
                rel_type: rel.rel_type.to_string(),
                properties,
            })
            .await?;
        match outcome {
            MergeOutcome::Created => report.relationships_created += 1,
            MergeOutcome::Matched => report.relationships_existing += 1,
        }
    }

    info!(
        "Seeded demo data into {}: {} nodes new, {} present; {} relationships new, {} present",
        store.backend(),
        report.nodes_created,
        report.nodes_existing,
        report.relationships_created,
        report.relationships_existing
    );
    Ok(report)
}
