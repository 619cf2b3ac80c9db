//! Configuration: layered load (file, then `ARBOR_*` environment) and
//! storage-path resolution.

use crate::error::VfsError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArborConfig {
    #[serde(default)]
    pub project: ProjectConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Project identity, used for export metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default = "default_project_name")]
    pub name: String,
}

fn default_project_name() -> String {
    "workspace".to_string()
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: default_project_name(),
        }
    }
}

/// Backing-store location. None means the platform data directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolve the store path: explicit config wins, otherwise the
    /// platform data directory.
    pub fn resolve_path(&self) -> Result<PathBuf, VfsError> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }
        let project_dirs = directories::ProjectDirs::from("", "arbor", "arbor").ok_or_else(|| {
            VfsError::Config("Could not determine platform data directory for the store".to_string())
        })?;
        Ok(project_dirs.data_dir().join("store"))
    }
}

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration, merging (lowest to highest precedence):
    /// defaults, the given config file (or `arbor.toml` in the working
    /// directory when none is given), and `ARBOR_*` environment variables
    /// (e.g. `ARBOR_STORAGE__PATH`).
    pub fn load(config_file: Option<&Path>) -> Result<ArborConfig, VfsError> {
        let mut builder = config::Config::builder();
        builder = match config_file {
            Some(path) => builder.add_source(config::File::from(path.to_path_buf())),
            None => builder.add_source(config::File::with_name("arbor").required(false)),
        };
        builder = builder.add_source(config::Environment::with_prefix("ARBOR").separator("__"));

        let merged = builder
            .build()
            .map_err(|e| VfsError::Config(e.to_string()))?;
        merged
            .try_deserialize()
            .map_err(|e| VfsError::Config(e.to_string()))
    }

    /// Render the default configuration as a TOML document (`init`).
    pub fn default_toml() -> Result<String, VfsError> {
        toml::to_string_pretty(&ArborConfig::default())
            .map_err(|e| VfsError::Config(e.to_string()))
    }
}
