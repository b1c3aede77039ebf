//! In-memory file system with explicit timestamps.
//!
//! Useful for embedding and for tests that need exact control over modified
//! times. Writes are stamped from a logical clock that only moves forward.

use super::{FileSystem, Location};
use crate::error::StorageError;
use crate::path::AssetPath;
use crate::types::{FileType, GameDirectory, Platform, Timestamp};
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct MemoryFile {
    modified: Timestamp,
    data: Vec<u8>,
}

#[derive(Debug, Default)]
struct MemoryTree {
    files: HashMap<(Location, AssetPath), MemoryFile>,
    clock: Timestamp,
    reject_writes: bool,
}

impl MemoryTree {
    fn tick(&mut self) -> Timestamp {
        self.clock += 1;
        self.clock
    }
}

#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    tree: RwLock<MemoryTree>,
}

fn in_directory(directory: AssetPath, file: AssetPath) -> bool {
    if file.directory() != directory.directory() {
        return false;
    }
    if directory.file_type() != FileType::Unknown
        && directory.file_type().source_extension() != file.file_type().source_extension()
    {
        return false;
    }
    let dir = directory.name();
    dir.is_empty()
        || file
            .name()
            .strip_prefix(dir)
            .map(|rest| rest.starts_with('/'))
            .unwrap_or(false)
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    fn set(&self, location: Location, path: AssetPath, modified: Timestamp) {
        let mut tree = self.tree.write();
        tree.clock = tree.clock.max(modified);
        tree.files
            .entry((location, path))
            .and_modify(|f| f.modified = modified)
            .or_insert(MemoryFile {
                modified,
                data: Vec::new(),
            });
    }

    /// Create or touch a source file.
    pub fn set_source(&self, path: AssetPath, modified: Timestamp) {
        self.set(Location::Source, path, modified);
    }

    /// Create or touch a cooked file.
    pub fn set_cooked(&self, platform: Platform, path: AssetPath, modified: Timestamp) {
        self.set(Location::Cooked(platform), path, modified);
    }

    pub fn remove_source(&self, path: AssetPath) -> bool {
        self.tree
            .write()
            .files
            .remove(&(Location::Source, path))
            .is_some()
    }

    pub fn remove_cooked(&self, platform: Platform, path: AssetPath) -> bool {
        self.tree
            .write()
            .files
            .remove(&(Location::Cooked(platform), path))
            .is_some()
    }

    pub fn contains(&self, location: Location, path: AssetPath) -> bool {
        self.tree.read().files.contains_key(&(location, path))
    }

    /// Make every subsequent write fail until cleared.
    pub fn set_reject_writes(&self, reject: bool) {
        self.tree.write().reject_writes = reject;
    }

    /// Overwrite a cooked file's bytes without going through the write path.
    pub fn put_cooked_bytes(&self, platform: Platform, path: AssetPath, data: &[u8]) {
        let mut tree = self.tree.write();
        let modified = tree.tick();
        tree.files.insert(
            (Location::Cooked(platform), path),
            MemoryFile {
                modified,
                data: data.to_vec(),
            },
        );
    }
}

impl FileSystem for MemoryFileSystem {
    fn modified_time_in_source(&self, path: AssetPath) -> Option<Timestamp> {
        self.tree
            .read()
            .files
            .get(&(Location::Source, path))
            .map(|f| f.modified)
    }

    fn modified_time_for_platform(
        &self,
        platform: Platform,
        path: AssetPath,
    ) -> Option<Timestamp> {
        self.tree
            .read()
            .files
            .get(&(Location::Cooked(platform), path))
            .map(|f| f.modified)
    }

    fn recursive_file_count(&self, directory: AssetPath) -> u32 {
        let count = self
            .tree
            .read()
            .files
            .keys()
            .filter(|(location, file)| *location == Location::Source && in_directory(directory, *file))
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    fn read_for_platform(
        &self,
        platform: Platform,
        path: AssetPath,
    ) -> Result<Vec<u8>, StorageError> {
        self.tree
            .read()
            .files
            .get(&(Location::Cooked(platform), path))
            .map(|f| f.data.clone())
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }

    fn write_for_platform(
        &self,
        platform: Platform,
        path: AssetPath,
        data: &[u8],
    ) -> Result<(), StorageError> {
        let mut tree = self.tree.write();
        if tree.reject_writes {
            return Err(StorageError::WriteRejected(path.to_string()));
        }
        let modified = tree.tick();
        tree.files.insert(
            (Location::Cooked(platform), path),
            MemoryFile {
                modified,
                data: data.to_vec(),
            },
        );
        Ok(())
    }

    fn list_for_platform(&self, platform: Platform, directory: GameDirectory) -> Vec<AssetPath> {
        let mut out: Vec<AssetPath> = self
            .tree
            .read()
            .files
            .keys()
            .filter(|(location, path)| {
                *location == Location::Cooked(platform) && path.directory() == directory
            })
            .map(|(_, path)| *path)
            .collect();
        out.sort_by_key(|p| p.url());
        out
    }

    fn delete_for_platform(&self, platform: Platform, path: AssetPath) -> Result<(), StorageError> {
        let mut tree = self.tree.write();
        if tree.reject_writes {
            return Err(StorageError::WriteRejected(path.to_string()));
        }
        tree.files.remove(&(Location::Cooked(platform), path));
        Ok(())
    }
}
