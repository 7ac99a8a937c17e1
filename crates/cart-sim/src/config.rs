use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Products the driver picks from when no catalog is configured.
pub const DEFAULT_CATALOG: [&str; 6] = ["milk", "flour", "eggs", "bacon", "ham", "coffee"];

/// Errors raised while loading or checking driver configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`SimulationConfig`].
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// At least one client is required.
    #[error("simulation needs at least one client")]
    NoClients,

    /// Random workloads need something to pick.
    #[error("product catalog is empty")]
    EmptyCatalog,

    /// A scripted step is not of the form `client:item`.
    #[error("invalid step '{0}', expected <client>:<item>")]
    InvalidStep(String),
}

/// Parameters of a random cart workload.
///
/// Every field has a default, so a config file only needs to name what it
/// changes:
///
/// ```toml
/// clients = 4
/// rounds = 25
/// catalog = ["milk", "eggs", "tea"]
/// seed = 42
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of clients, named `client_1` .. `client_N`.
    pub clients: usize,
    /// Number of writes to issue.
    pub rounds: usize,
    /// Items the workload picks from.
    pub catalog: Vec<String>,
    /// Seed for a reproducible workload. Random when absent.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            clients: 3,
            rounds: 10,
            catalog: DEFAULT_CATALOG.iter().map(|s| s.to_string()).collect(),
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Parse a TOML document. Missing fields fall back to defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Reject configurations the driver cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.clients == 0 {
            return Err(ConfigError::NoClients);
        }
        if self.catalog.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        Ok(())
    }

    /// Client names in construction order.
    pub fn client_names(&self) -> Vec<String> {
        (1..=self.clients).map(|i| format!("client_{i}")).collect()
    }
}
