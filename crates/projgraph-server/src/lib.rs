//! ProjGraph server: dashboard page and JSON API over a graph store.

pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
