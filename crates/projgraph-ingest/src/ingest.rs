//! Project loading pipeline: CSV rows → one upsert transaction per row.

use std::path::Path;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, error, info};

use crate::file;
use projgraph_core::Result;
use projgraph_store::{GraphStore, MergeOutcome, PropertyMap};

/// Summary of a completed load.
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub source: String,
    pub rows: usize,
    pub created: usize,
    pub updated: usize,
    pub elapsed_ms: u128,
}

/// Upserts project rows into a graph store.
///
/// Rows are written one transaction at a time. The first failure stops
/// the batch and is returned; rows written before it stay written.
pub struct Loader<'a> {
    store: &'a dyn GraphStore,
}

impl<'a> Loader<'a> {
    pub fn new(store: &'a dyn GraphStore) -> Self {
        Self { store }
    }

    /// Read a CSV file and upsert every row.
    pub async fn load_file(&self, path: &Path) -> Result<LoadReport> {
        let rows = file::read_rows(path)?;
        info!("Read {} rows from {}", rows.len(), path.display());
        self.load_rows(&path.display().to_string(), rows).await
    }

    /// Upsert already-parsed rows in order.
    pub async fn load_rows(&self, source: &str, rows: Vec<PropertyMap>) -> Result<LoadReport> {
        let started = Instant::now();
        let total = rows.len();
        let mut created = 0;
        let mut updated = 0;

        for (index, row) in rows.into_iter().enumerate() {
            let id = row.get("id").map(|v| v.to_string()).unwrap_or_default();
            match self.store.upsert_project(row).await {
                Ok(MergeOutcome::Created) => created += 1,
                Ok(MergeOutcome::Matched) => updated += 1,
                Err(e) => {
                    error!(
                        "Upsert failed at row {} of {} (id={}): {}. {} rows already written.",
                        index + 1,
                        total,
                        id,
                        e,
                        index
                    );
                    return Err(e);
                }
            }
            debug!("Upserted project id={}", id);
        }

        let report = LoadReport {
            source: source.to_string(),
            rows: total,
            created,
            updated,
            elapsed_ms: started.elapsed().as_millis(),
        };
        info!(
            "Loaded {} projects into {} ({} new, {} updated)",
            report.rows,
            self.store.backend(),
            report.created,
            report.updated
        );
        Ok(report)
    }
}
