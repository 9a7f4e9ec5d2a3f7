//! Configuration types and parsing for tidemark.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Config file names searched in a project directory, in order.
pub const CONFIG_FILE_NAMES: &[&str] = &["tidemark.yml", "tidemark.yaml"];

/// DuckDB path that opens a throwaway in-memory database.
pub const MEMORY_PATH: &str = ":memory:";

/// Main project configuration from tidemark.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// Directory containing `<version>_<name>.up.sql` files
    #[serde(default = "default_migrations_path")]
    pub migrations_path: String,

    /// Ledger table, optionally schema-qualified
    #[serde(default = "default_ledger_table")]
    pub ledger_table: String,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Named target configurations (e.g., dev, prod)
    #[serde(default)]
    pub targets: HashMap<String, TargetConfig>,
}

/// Target-specific configuration overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Database connection override
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Ledger table override
    #[serde(default)]
    pub ledger_table: Option<String>,
}

/// Database connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// DuckDB file path, relative to the project root, or `:memory:`
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl DatabaseConfig {
    /// Whether this configuration opens an in-memory database
    pub fn is_memory(&self) -> bool {
        self.path == MEMORY_PATH
    }

    /// Resolve the database file against the project root.
    ///
    /// Returns `None` for in-memory databases.
    pub fn path_absolute(&self, root: &Path) -> Option<PathBuf> {
        if self.is_memory() {
            return None;
        }
        Some(root.join(&self.path))
    }
}

fn default_migrations_path() -> String {
    "migrations".to_string()
}

fn default_ledger_table() -> String {
    "schema_migrations".to_string()
}

fn default_db_path() -> String {
    MEMORY_PATH.to_string()
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for tidemark.yml or tidemark.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
            .map_or_else(
                || {
                    Err(CoreError::ConfigNotFound {
                        path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
                    })
                },
                |path| Self::load(&path),
            )
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Project name cannot be empty".to_string(),
            });
        }
        if self.migrations_path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "migrations_path cannot be empty".to_string(),
            });
        }
        if self.ledger_table.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "ledger_table cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Absolute path of the migrations directory
    pub fn migrations_path_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.migrations_path)
    }

    fn target(&self, name: &str) -> CoreResult<&TargetConfig> {
        self.targets.get(name).ok_or_else(|| {
            let mut available: Vec<&str> = self.targets.keys().map(|k| k.as_str()).collect();
            available.sort_unstable();
            CoreError::ConfigInvalid {
                message: format!(
                    "Target '{}' not found. Available targets: {}",
                    name,
                    available.join(", ")
                ),
            }
        })
    }

    /// Get database configuration, optionally applying target overrides
    pub fn database_config(&self, target: Option<&str>) -> CoreResult<DatabaseConfig> {
        match target {
            Some(name) => Ok(self
                .target(name)?
                .database
                .clone()
                .unwrap_or_else(|| self.database.clone())),
            None => Ok(self.database.clone()),
        }
    }

    /// Get the ledger table, optionally applying target overrides
    pub fn ledger_table(&self, target: Option<&str>) -> CoreResult<&str> {
        match target {
            Some(name) => Ok(self
                .target(name)?
                .ledger_table
                .as_deref()
                .unwrap_or(&self.ledger_table)),
            None => Ok(&self.ledger_table),
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
