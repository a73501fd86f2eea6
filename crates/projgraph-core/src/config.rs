//! Configuration: database credentials and server settings.
//!
//! Credentials are resolved per field from a TOML secrets file, then the
//! environment (including a `.env` file), then hard-coded defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const DEFAULT_BOLT_URL: &str = "bolt://localhost:7687";
pub const DEFAULT_USER: &str = "neo4j";
pub const DEFAULT_PASSWORD: &str = "test12345";
pub const DEFAULT_CSV_PATH: &str = "data/projects.csv";
pub const DEFAULT_PORT: u16 = 8501;

/// Secrets file locations tried when `PROJGRAPH_SECRETS` is unset.
const SECRETS_CANDIDATES: &[&str] = &[".streamlit/secrets.toml", "secrets.toml"];

/// Contents of the secrets file. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecretsFile {
    pub bolt_url: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl SecretsFile {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load the first secrets file found, or an empty one.
    pub fn discover() -> Self {
        let candidates: Vec<PathBuf> = match std::env::var("PROJGRAPH_SECRETS") {
            Ok(path) => vec![PathBuf::from(path)],
            Err(_) => SECRETS_CANDIDATES.iter().map(PathBuf::from).collect(),
        };

        for path in candidates {
            if !path.exists() {
                continue;
            }
            match Self::load(&path) {
                Ok(secrets) => {
                    tracing::debug!("Using secrets from {}", path.display());
                    return secrets;
                }
                Err(e) => tracing::warn!("Ignoring unreadable secrets file: {}", e),
            }
        }
        Self::default()
    }
}

/// Bolt connection parameters.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub bolt_url: String,
    pub user: String,
    #[serde(skip_serializing)]
    pub password: String,
}

impl ConnectionSettings {
    /// Resolve each field from secrets, then `env`, then the defaults.
    pub fn resolve(secrets: &SecretsFile, env: impl Fn(&str) -> Option<String>) -> Self {
        let pick = |secret: &Option<String>, var: &str, default: &str| {
            secret
                .clone()
                .filter(|v| !v.is_empty())
                .or_else(|| env(var).filter(|v| !v.is_empty()))
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            bolt_url: pick(&secrets.bolt_url, "BOLT_URL", DEFAULT_BOLT_URL),
            user: pick(&secrets.user, "NEO4J_USER", DEFAULT_USER),
            password: pick(&secrets.password, "NEO4J_PASS", DEFAULT_PASSWORD),
        }
    }

    pub fn from_env() -> Self {
        Self::resolve(&SecretsFile::discover(), |var| std::env::var(var).ok())
    }
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self::resolve(&SecretsFile::default(), |_| None)
    }
}

impl std::fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("bolt_url", &self.bolt_url)
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

/// Which graph store implementation to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Neo4j,
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "neo4j" | "bolt" => Ok(Self::Neo4j),
            "memory" | "mem" => Ok(Self::Memory),
            other => Err(Error::Config(format!("unknown store backend: {}", other))),
        }
    }
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Neo4j => write!(f, "neo4j"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

/// Top-level ProjGraph configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjGraphConfig {
    /// HTTP server port.
    pub port: u16,
    /// CSV file read by the loader when no path is given.
    pub csv_path: PathBuf,
    pub backend: StoreBackend,
    /// Traversal depth used when a request does not specify one.
    pub default_hops: u8,
    pub connection: ConnectionSettings,
}

impl ProjGraphConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env() -> Result<Self> {
        // A missing .env file is the normal case.
        let _ = dotenvy::dotenv();

        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let csv_path = std::env::var("PROJGRAPH_CSV")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CSV_PATH));

        let backend = match std::env::var("PROJGRAPH_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => StoreBackend::Neo4j,
        };

        let default_hops = std::env::var("PROJGRAPH_HOPS")
            .ok()
            .and_then(|h| h.parse().ok())
            .map(clamp_hops)
            .unwrap_or(2);

        Ok(Self {
            port,
            csv_path,
            backend,
            default_hops,
            connection: ConnectionSettings::from_env(),
        })
    }
}

/// Traversals are limited to one or two hops.
pub fn clamp_hops(hops: u8) -> u8 {
    hops.clamp(1, 2)
}
