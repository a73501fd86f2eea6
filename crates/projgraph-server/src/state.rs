//! Shared application state.

use std::sync::Arc;

use projgraph_core::ProjGraphConfig;
use projgraph_store::GraphStore;

/// Shared application state accessible from all route handlers.
///
/// The store handle is opened once at startup and reused by every request.
pub struct AppState {
    pub config: ProjGraphConfig,
    pub store: Arc<dyn GraphStore>,
}

impl AppState {
    pub fn new(config: ProjGraphConfig, store: Arc<dyn GraphStore>) -> Self {
        Self { config, store }
    }
}
