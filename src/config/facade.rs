//! ConfigLoader facade delegating to the merge service.

use super::merge::service::MergeService;
use super::CookDbConfig;
use crate::error::ApiError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for `workspace_root` from its `cookdb.toml`, if any,
    /// and the environment.
    pub fn load(workspace_root: &Path) -> Result<CookDbConfig, ApiError> {
        let config = MergeService::load(workspace_root)?;
        Ok(config.resolve_paths(workspace_root))
    }

    /// Load configuration from a specific file. Relative paths in it are
    /// resolved against the file's directory.
    pub fn load_from_file(path: &Path) -> Result<CookDbConfig, ApiError> {
        let config = MergeService::load_from_file(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(config.resolve_paths(base))
    }
}
