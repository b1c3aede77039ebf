//! MergeService: stacks the configuration sources and deserializes to CookDbConfig.

use crate::config::sources::{environment, workspace_file};
use crate::config::CookDbConfig;
use config::{Config, ConfigError, File, FileFormat};
use std::path::Path;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Precedence: defaults (lowest) -> workspace file -> environment (highest).
    pub fn load(workspace_root: &Path) -> Result<CookDbConfig, ConfigError> {
        let builder = Config::builder();
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder)?;
        builder.build()?.try_deserialize()
    }

    /// Load from a specific file with the environment overlay. The file must
    /// exist.
    pub fn load_from_file(path: &Path) -> Result<CookDbConfig, ConfigError> {
        let builder = Config::builder().add_source(File::from(path).format(FileFormat::Toml));
        let builder = environment::add_to_builder(builder)?;
        builder.build()?.try_deserialize()
    }
}
