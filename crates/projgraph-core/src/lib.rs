//! ProjGraph Core: error type, connection settings, configuration.

pub mod config;
pub mod error;

pub use config::{ConnectionSettings, ProjGraphConfig, StoreBackend};
pub use error::{Error, Result};
