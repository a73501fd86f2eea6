//! ProjGraph Ingest: CSV reading, project upserts, demo seeding.

pub mod file;
pub mod ingest;
pub mod seed;

pub use file::{parse_rows, read_rows};
pub use ingest::{LoadReport, Loader};
pub use seed::{seed_demo_data, SeedReport};
