//! Registry configuration.
//!
//! Loaded from an optional YAML file; every key may be omitted.
//!
//! # Example YAML
//!
//! ```yaml
//! database: /var/lib/cadastro/people.db
//! prefix: cad_
//! max_attempts: 5
//! ```
//!
//! Command-line flags and their environment variables take precedence
//! over the file, see [`RegistryConfig::apply_overrides`].

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use cadastro_core::RetryPolicy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Database file used when nothing else is configured.
pub const DEFAULT_DATABASE: &str = "cadastro.db";

/// Table prefix used when nothing else is configured.
pub const DEFAULT_PREFIX: &str = "cad_";

/// Errors reading or writing the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// SQLite database file.
    pub database: PathBuf,
    /// Table prefix, alphanumerics and underscores only.
    pub prefix: String,
    /// Invalid entries allowed per field while registering; unbounded if absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
            prefix: DEFAULT_PREFIX.to_string(),
            max_attempts: None,
        }
    }
}

impl RegistryConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::IoError`] if the file cannot be read, or
    /// [`ConfigError::YamlError`] if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Replaces file values with those given on the command line.
    pub fn apply_overrides(
        &mut self,
        database: Option<PathBuf>,
        prefix: Option<String>,
        max_attempts: Option<u32>,
    ) {
        if let Some(database) = database {
            self.database = database;
        }
        if let Some(prefix) = prefix {
            self.prefix = prefix;
        }
        if max_attempts.is_some() {
            self.max_attempts = max_attempts;
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
        }
    }
}
