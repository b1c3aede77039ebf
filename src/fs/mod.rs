//! File system collaborator
//!
//! The database never touches the disk directly; every stat, listing, read,
//! and write goes through [`FileSystem`]. Two trees are visible through it:
//! the source tree (authoring files) and one cooked tree per platform.

pub mod disk;
pub mod memory;

pub use disk::DiskFileSystem;
pub use memory::MemoryFileSystem;

use crate::error::StorageError;
use crate::path::AssetPath;
use crate::types::{GameDirectory, Platform, Timestamp};

/// Which tree a file lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    Source,
    Cooked(Platform),
}

/// File system interface
///
/// Stat operations return `None`/`0` for missing files rather than errors:
/// absence is an ordinary answer for freshness checks.
pub trait FileSystem: Send + Sync {
    /// Modified time of the file in the source tree.
    fn modified_time_in_source(&self, path: AssetPath) -> Option<Timestamp>;

    /// Modified time of the file in `platform`'s cooked tree.
    fn modified_time_for_platform(&self, platform: Platform, path: AssetPath)
        -> Option<Timestamp>;

    /// Number of files below a source directory, recursively. When the
    /// directory path has a file type, only files with that type's source
    /// extension are counted. Missing directories count zero.
    fn recursive_file_count(&self, directory: AssetPath) -> u32;

    fn read_for_platform(&self, platform: Platform, path: AssetPath)
        -> Result<Vec<u8>, StorageError>;

    fn write_for_platform(
        &self,
        platform: Platform,
        path: AssetPath,
        data: &[u8],
    ) -> Result<(), StorageError>;

    /// Every file in `platform`'s cooked tree under `directory`.
    fn list_for_platform(&self, platform: Platform, directory: GameDirectory) -> Vec<AssetPath>;

    fn delete_for_platform(&self, platform: Platform, path: AssetPath)
        -> Result<(), StorageError>;
}
