//! ProjGraph Store: property graph access over Neo4j or an in-memory graph.

pub mod cypher;
pub mod graph;
pub mod neo4j;
pub mod types;

pub use graph::MemoryStore;
pub use neo4j::Neo4jStore;
pub use types::*;

use std::sync::Arc;

use async_trait::async_trait;
use projgraph_core::{Error, ProjGraphConfig, Result, StoreBackend};

/// Operations the loader, seeder and dashboard need from a graph database.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Short backend name for logs and the health endpoint.
    fn backend(&self) -> &'static str;

    /// Merge a node on `label {key: value}` and add/overwrite `properties`.
    /// Each call runs in its own transaction.
    async fn merge_node(&self, merge: &NodeMerge) -> Result<MergeOutcome>;

    /// Merge a typed relationship between two existing nodes.
    async fn merge_relationship(&self, merge: &RelationshipMerge) -> Result<MergeOutcome>;

    /// Sorted, distinct names of all `Project` nodes.
    async fn project_names(&self) -> Result<Vec<String>>;

    /// The named project and every node reachable within `hops` steps.
    /// `None` when no project has that name.
    async fn neighborhood(&self, project_name: &str, hops: u8) -> Result<Option<Neighborhood>>;

    async fn relationship_count(&self) -> Result<u64>;

    async fn stats(&self) -> Result<StoreStats>;

    /// Upsert a `Project` keyed by its `id` property.
    async fn upsert_project(&self, properties: PropertyMap) -> Result<MergeOutcome> {
        let id = match properties.get("id") {
            Some(value) if !value.is_null() => value.clone(),
            _ => return Err(Error::Validation("project row has no id".into())),
        };
        self.merge_node(&NodeMerge {
            label: PROJECT_LABEL.to_string(),
            key: "id".to_string(),
            value: id,
            properties,
        })
        .await
    }
}

/// Open the configured backend.
pub async fn open_store(config: &ProjGraphConfig) -> Result<Arc<dyn GraphStore>> {
    match config.backend {
        StoreBackend::Neo4j => Ok(Arc::new(Neo4jStore::connect(&config.connection).await?)),
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
    }
}

/// Open the configured backend, falling back to an empty in-memory store
/// when Neo4j cannot be reached.
pub async fn open_store_or_memory(config: &ProjGraphConfig) -> Arc<dyn GraphStore> {
    match open_store(config).await {
        Ok(store) => {
            tracing::info!("Using {} graph store", store.backend());
            store
        }
        Err(e) => {
            tracing::warn!("Graph store unavailable: {}. Falling back to in-memory store.", e);
            Arc::new(MemoryStore::new())
        }
    }
}
