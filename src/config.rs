//! Runtime configuration.
//!
//! Settings come from an optional JSON file. Missing keys fall back to
//! defaults, and the `PETSIM_DB` environment variable overrides the database
//! path.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable that overrides [`Config::database_path`].
pub const DATABASE_ENV: &str = "PETSIM_DB";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite database file
    pub database_path: PathBuf,
    /// User created on first run
    pub default_username: String,
    /// Pet created for the default user on first run
    pub default_pet_name: String,
    /// `tracing` filter directive, used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("pets.db"),
            default_username: "player1".to_string(),
            default_pet_name: "Fluffy".to_string(),
            log_filter: "petsim=info".to_string(),
        }
    }
}

impl Config {
    /// Parse a config from JSON text.
    pub fn from_json(path: &Path, json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `path` if given, otherwise start from defaults, then apply
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_json(path, &json)?
            }
            None => Self::default(),
        };

        Ok(config.with_database_override(std::env::var_os(DATABASE_ENV).map(PathBuf::from)))
    }

    /// Replace the database path when an override is present.
    pub fn with_database_override(mut self, database_path: Option<PathBuf>) -> Self {
        if let Some(path) = database_path {
            self.database_path = path;
        }
        self
    }
}
