//! Configuration
//!
//! [`CookDbConfig`] is composed by the `config` crate from defaults, an
//! optional `cookdb.toml` in the workspace, and `COOKDB__*` environment
//! variables, in increasing precedence. Relative tree paths are resolved
//! against the directory the configuration was loaded for.

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

use crate::logging::LoggingConfig;
use crate::types::Platform;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Workspace configuration file name
pub const CONFIG_FILE_NAME: &str = "cookdb.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CookDbConfig {
    #[serde(default = "default_platform")]
    pub platform: Platform,

    /// Root of the authoring tree
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,

    /// Root holding one cooked tree per platform
    #[serde(default = "default_cooked_dir")]
    pub cooked_dir: PathBuf,

    /// Reconcile the one-to-one version table when the database opens
    #[serde(default)]
    pub process_one_to_one_versions: bool,

    /// Use the OS file watcher
    #[serde(default)]
    pub watch: bool,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_platform() -> Platform {
    if cfg!(target_os = "linux") {
        Platform::Linux
    } else {
        Platform::Pc
    }
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("Source")
}

fn default_cooked_dir() -> PathBuf {
    PathBuf::from("Cooked")
}

impl Default for CookDbConfig {
    fn default() -> Self {
        Self {
            platform: default_platform(),
            source_dir: default_source_dir(),
            cooked_dir: default_cooked_dir(),
            process_one_to_one_versions: false,
            watch: false,
            logging: LoggingConfig::default(),
        }
    }
}

impl CookDbConfig {
    /// Make relative tree paths absolute under `base`.
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        if self.source_dir.is_relative() {
            self.source_dir = base.join(&self.source_dir);
        }
        if self.cooked_dir.is_relative() {
            self.cooked_dir = base.join(&self.cooked_dir);
        }
        self
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, crate::error::ApiError> {
        toml::to_string_pretty(self).map_err(|e| crate::error::ApiError::ConfigError(e.to_string()))
    }
}
