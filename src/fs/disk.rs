//! Disk-backed file system over a source root and a cooked root.
//!
//! Layout:
//! - source: `<source_dir>/<relative><source ext>` for content,
//!   `<source_dir>/<scheme>/...` for the other root directories
//! - cooked: `<cooked_dir>/<Platform>/<scheme>/<relative><cooked ext>`

use super::FileSystem;
use crate::error::StorageError;
use crate::path::AssetPath;
use crate::types::{GameDirectory, Platform, Timestamp};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct DiskFileSystem {
    source_dir: PathBuf,
    cooked_dir: PathBuf,
}

fn canonical_or_given(path: &Path) -> PathBuf {
    dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn modified_time(path: &Path) -> Option<Timestamp> {
    let metadata = std::fs::metadata(path).ok()?;
    if !metadata.is_file() {
        return None;
    }
    let modified = metadata.modified().ok()?;
    modified
        .duration_since(UNIX_EPOCH)
        .ok()
        .map(|d| d.as_secs())
}

fn has_extension(path: &Path, extension: &str) -> bool {
    extension.is_empty()
        || path
            .to_string_lossy()
            .to_lowercase()
            .ends_with(extension)
}

/// Relative path as a `/`-separated string, or `None` if `path` is not
/// below `root`.
fn relative_to(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

impl DiskFileSystem {
    /// Roots are canonicalized when they exist so they line up with the
    /// absolute paths an OS watcher reports.
    pub fn new(source_dir: impl AsRef<Path>, cooked_dir: impl AsRef<Path>) -> Self {
        Self {
            source_dir: canonical_or_given(source_dir.as_ref()),
            cooked_dir: canonical_or_given(cooked_dir.as_ref()),
        }
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn cooked_dir(&self) -> &Path {
        &self.cooked_dir
    }

    pub fn source_root(&self, directory: GameDirectory) -> PathBuf {
        match directory {
            GameDirectory::Content | GameDirectory::Unknown => self.source_dir.clone(),
            other => self.source_dir.join(other.scheme()),
        }
    }

    pub fn cooked_root(&self, platform: Platform, directory: GameDirectory) -> PathBuf {
        self.cooked_dir
            .join(platform.name())
            .join(directory.scheme())
    }

    pub fn source_file(&self, path: AssetPath) -> PathBuf {
        self.source_root(path.directory())
            .join(path.source_relative())
    }

    pub fn cooked_file(&self, platform: Platform, path: AssetPath) -> PathBuf {
        self.cooked_root(platform, path.directory())
            .join(path.cooked_relative())
    }

    /// Map an absolute path in the source tree back to its asset path.
    pub fn resolve_source(&self, absolute: &Path) -> Option<AssetPath> {
        let rel = relative_to(&self.source_dir, absolute)?;
        let (first, rest) = rel.split_once('/').unwrap_or((rel.as_str(), ""));
        match GameDirectory::from_scheme(first) {
            Some(directory) if directory != GameDirectory::Content && !rest.is_empty() => {
                Some(AssetPath::from_filename(directory, rest))
            }
            _ => Some(AssetPath::content(&rel)),
        }
    }

    /// Map an absolute path in `platform`'s cooked tree back to its asset path.
    pub fn resolve_cooked(&self, platform: Platform, absolute: &Path) -> Option<AssetPath> {
        let rel = relative_to(&self.cooked_dir.join(platform.name()), absolute)?;
        let (scheme, rest) = rel.split_once('/')?;
        let directory = GameDirectory::from_scheme(scheme)?;
        Some(AssetPath::from_filename(directory, rest))
    }
}

impl FileSystem for DiskFileSystem {
    fn modified_time_in_source(&self, path: AssetPath) -> Option<Timestamp> {
        modified_time(&self.source_file(path))
    }

    fn modified_time_for_platform(
        &self,
        platform: Platform,
        path: AssetPath,
    ) -> Option<Timestamp> {
        modified_time(&self.cooked_file(platform, path))
    }

    fn recursive_file_count(&self, directory: AssetPath) -> u32 {
        // The type of a directory path selects an extension filter; it is
        // not part of the directory name on disk.
        let root = self
            .source_root(directory.directory())
            .join(directory.name());
        if !root.is_dir() {
            return 0;
        }
        let extension = directory.file_type().source_extension();
        let count = WalkDir::new(&root)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(e) => Some(e),
                Err(e) => {
                    warn!(directory = %directory, error = %e, "Skipping unreadable entry");
                    None
                }
            })
            .filter(|e| e.file_type().is_file())
            .filter(|e| has_extension(e.path(), extension))
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    fn read_for_platform(
        &self,
        platform: Platform,
        path: AssetPath,
    ) -> Result<Vec<u8>, StorageError> {
        let file = self.cooked_file(platform, path);
        std::fs::read(&file).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound(file.display().to_string()),
            _ => StorageError::PathIo {
                path: file,
                source: e,
            },
        })
    }

    fn write_for_platform(
        &self,
        platform: Platform,
        path: AssetPath,
        data: &[u8],
    ) -> Result<(), StorageError> {
        let file = self.cooked_file(platform, path);
        if let Some(parent) = file.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::PathIo {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        std::fs::write(&file, data).map_err(|e| StorageError::PathIo {
            path: file.clone(),
            source: e,
        })?;
        debug!(file = %file.display(), bytes = data.len(), "Wrote cooked file");
        Ok(())
    }

    fn list_for_platform(&self, platform: Platform, directory: GameDirectory) -> Vec<AssetPath> {
        let root = self.cooked_root(platform, directory);
        if !root.is_dir() {
            return Vec::new();
        }
        WalkDir::new(&root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| relative_to(&root, e.path()))
            .map(|rel| AssetPath::from_filename(directory, &rel))
            .collect()
    }

    fn delete_for_platform(&self, platform: Platform, path: AssetPath) -> Result<(), StorageError> {
        let file = self.cooked_file(platform, path);
        match std::fs::remove_file(&file) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::PathIo {
                path: file,
                source: e,
            }),
        }
    }
}
