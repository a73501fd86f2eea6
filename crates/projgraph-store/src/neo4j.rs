//! Neo4j backend over Bolt, using `neo4rs`.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use neo4rs::{query, BoltNull, BoltType, Graph, Query, Row};
use serde::Deserialize;
use tracing::{debug, info};

use crate::cypher;
use crate::types::*;
use crate::GraphStore;
use projgraph_core::config::clamp_hops;
use projgraph_core::{ConnectionSettings, Error, Result};

/// Graph store backed by a Neo4j server.
pub struct Neo4jStore {
    graph: Graph,
}

/// Relationship as projected by the neighbourhood query.
#[derive(Deserialize)]
struct PathRelationship {
    id: String,
    start: String,
    end: String,
    rel_type: String,
    #[serde(default)]
    properties: PropertyMap,
}

impl Neo4jStore {
    /// Connect and verify the server answers a trivial query.
    pub async fn connect(settings: &ConnectionSettings) -> Result<Self> {
        let graph = Graph::new(
            settings.bolt_url.as_str(),
            settings.user.as_str(),
            settings.password.as_str(),
        )
        .await
        .map_err(db_err)?;

        let store = Self { graph };
        store.fetch_count(query("RETURN 1 AS count")).await?;
        info!("Connected to Neo4j at {} as {}", settings.bolt_url, settings.user);
        Ok(store)
    }

    async fn fetch_rows(&self, q: Query) -> Result<Vec<Row>> {
        let mut stream = self.graph.execute(q).await.map_err(db_err)?;
        let mut rows = Vec::new();
        while let Some(row) = stream.next().await.map_err(db_err)? {
            rows.push(row);
        }
        Ok(rows)
    }

    async fn fetch_count(&self, q: Query) -> Result<u64> {
        let rows = self.fetch_rows(q).await?;
        let count = match rows.first() {
            Some(row) => row.get::<i64>("count").map_err(db_err)?,
            None => 0,
        };
        Ok(count.max(0) as u64)
    }

    async fn fetch_counts(&self, q: Query, key: &str) -> Result<BTreeMap<String, u64>> {
        let mut counts = BTreeMap::new();
        for row in self.fetch_rows(q).await? {
            let name: String = row.get(key).map_err(db_err)?;
            let count: i64 = row.get("count").map_err(db_err)?;
            counts.insert(name, count.max(0) as u64);
        }
        Ok(counts)
    }

    /// Run a write statement returning a `created` column in its own
    /// transaction. Nothing returned means the statement matched nothing.
    async fn write_merge(&self, q: Query) -> Result<Option<MergeOutcome>> {
        let mut txn = self.graph.start_txn().await.map_err(db_err)?;
        let mut stream = txn.execute(q).await.map_err(db_err)?;

        let mut outcome = None;
        while let Some(row) = stream.next(txn.handle()).await.map_err(db_err)? {
            if outcome.is_none() {
                let created: bool = row.get("created").map_err(db_err)?;
                outcome = Some(if created {
                    MergeOutcome::Created
                } else {
                    MergeOutcome::Matched
                });
            }
        }

        txn.commit().await.map_err(db_err)?;
        Ok(outcome)
    }
}

#[async_trait]
impl GraphStore for Neo4jStore {
    fn backend(&self) -> &'static str {
        "neo4j"
    }

    async fn merge_node(&self, merge: &NodeMerge) -> Result<MergeOutcome> {
        validate_identifier("label", &merge.label)?;
        validate_identifier("property", &merge.key)?;

        let q = query(&cypher::merge_node(&merge.label, &merge.key))
            .param("value", to_bolt(&merge.value))
            .param("props", props_to_bolt(&merge.properties));

        let outcome = self.write_merge(q).await?.ok_or_else(|| {
            Error::Database(format!("MERGE on {} returned no rows", merge.label))
        })?;
        debug!("{:?} {} {}={}", outcome, merge.label, merge.key, merge.value);
        Ok(outcome)
    }

    async fn merge_relationship(&self, merge: &RelationshipMerge) -> Result<MergeOutcome> {
        validate_identifier("label", &merge.from.label)?;
        validate_identifier("property", &merge.from.key)?;
        validate_identifier("label", &merge.to.label)?;
        validate_identifier("property", &merge.to.key)?;
        validate_identifier("relationship type", &merge.rel_type)?;

        let statement = cypher::merge_relationship(
            &merge.from.label,
            &merge.from.key,
            &merge.to.label,
            &merge.to.key,
            &merge.rel_type,
        );
        let q = query(&statement)
            .param("from", to_bolt(&merge.from.value))
            .param("to", to_bolt(&merge.to.value))
            .param("props", props_to_bolt(&merge.properties));

        self.write_merge(q).await?.ok_or_else(|| {
            Error::NotFound(format!(
                "{} endpoints {}={} / {}={}",
                merge.rel_type, merge.from.key, merge.from.value, merge.to.key, merge.to.value
            ))
        })
    }

    async fn project_names(&self) -> Result<Vec<String>> {
        let rows = self.fetch_rows(query(cypher::PROJECT_NAMES)).await?;
        rows.iter()
            .map(|row| row.get::<String>("name").map_err(db_err))
            .collect()
    }

    async fn neighborhood(&self, project_name: &str, hops: u8) -> Result<Option<Neighborhood>> {
        let hops = clamp_hops(hops);
        let q = query(&cypher::neighborhood(hops)).param("name", project_name);
        let rows = self.fetch_rows(q).await?;

        let Some(first) = rows.first() else {
            return Ok(None);
        };

        let center = GraphNode {
            id: first.get("center_id").map_err(db_err)?,
            labels: first.get("center_labels").map_err(db_err)?,
            properties: first.get("center_props").map_err(db_err)?,
        };

        let mut neighbors = Vec::new();
        for row in &rows {
            let Some(node_id) = row.get::<Option<String>>("node_id").map_err(db_err)? else {
                continue;
            };
            let node = GraphNode {
                id: node_id,
                labels: row.get("node_labels").map_err(db_err)?,
                properties: row.get("node_props").map_err(db_err)?,
            };
            let path = row
                .get::<Option<Vec<PathRelationship>>>("path")
                .map_err(db_err)?
                .unwrap_or_default()
                .into_iter()
                .map(|r| GraphRelationship {
                    id: r.id,
                    start: r.start,
                    end: r.end,
                    rel_type: r.rel_type,
                    properties: r.properties,
                })
                .collect();
            neighbors.push(NeighborRow { node, path });
        }

        debug!(
            "Neighborhood of {:?} ({} hops): {} rows",
            project_name,
            hops,
            neighbors.len()
        );

        Ok(Some(Neighborhood {
            center,
            hops,
            rows: neighbors,
        }))
    }

    async fn relationship_count(&self) -> Result<u64> {
        self.fetch_count(query(cypher::RELATIONSHIP_COUNT)).await
    }

    async fn stats(&self) -> Result<StoreStats> {
        Ok(StoreStats {
            backend: self.backend().to_string(),
            node_count: self.fetch_count(query(cypher::NODE_COUNT)).await?,
            relationship_count: self.relationship_count().await?,
            labels: self.fetch_counts(query(cypher::LABEL_COUNTS), "label").await?,
            relationship_types: self
                .fetch_counts(query(cypher::RELATIONSHIP_TYPE_COUNTS), "rel_type")
                .await?,
        })
    }
}

fn db_err(e: impl std::fmt::Display) -> Error {
    Error::Database(e.to_string())
}

/// Convert a JSON property value into a Bolt parameter.
fn to_bolt(value: &serde_json::Value) -> BoltType {
    match value {
        serde_json::Value::Null => BoltType::Null(BoltNull),
        serde_json::Value::Bool(b) => BoltType::from(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => BoltType::from(i),
            None => BoltType::from(n.as_f64().unwrap_or_default()),
        },
        serde_json::Value::String(s) => BoltType::from(s.as_str()),
        serde_json::Value::Array(items) => {
            BoltType::from(items.iter().map(to_bolt).collect::<Vec<BoltType>>())
        }
        serde_json::Value::Object(map) => BoltType::from(
            map.iter()
                .map(|(k, v)| (k.clone(), to_bolt(v)))
                .collect::<HashMap<String, BoltType>>(),
        ),
    }
}

fn props_to_bolt(props: &PropertyMap) -> BoltType {
    BoltType::from(
        props
            .iter()
            .map(|(k, v)| (k.clone(), to_bolt(v)))
            .collect::<HashMap<String, BoltType>>(),
    )
}
