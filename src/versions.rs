//! Cooker and data versions
//!
//! Every record carries the cooker version and the data version of its
//! output type at the time it was written; a mismatch with the current
//! values invalidates the record wholesale.
//!
//! One-to-one types (a single source cooked straight into a single output)
//! have no per-output record. Their versions are tracked in one table per
//! platform, `version_data.dat` in the cooked content tree. When that table
//! disagrees with the compiled versions, every cooked file of the affected
//! types is deleted so it gets cooked again.

use crate::error::StorageError;
use crate::fs::FileSystem;
use crate::path::AssetPath;
use crate::types::{FileType, GameDirectory, Platform, FILE_TYPE_COUNT};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Advance when the cooker changes so much that every asset must be recooked.
/// Prefer bumping a per-type data version.
pub const COOKER_VERSION: u32 = 39;

/// Per-type data versions, indexed by `FileType` discriminant
const DATA_VERSIONS: [u32; FILE_TYPE_COUNT] = [
    1,  // Unknown
    10, // Animation2D
    1,  // Csv
    1,  // Effect
    1,  // EffectHeader
    1,  // Exe
    7,  // Font
    3,  // FxBank
    1,  // Html
    1,  // Json
    1,  // PemCertificate
    1,  // Protobuf
    1,  // SaveGame
    2,  // SceneAsset
    2,  // ScenePrefab
    7,  // Script
    13, // SoundBank
    13, // SoundProject
    3,  // Texture0
    1,  // Texture1
    1,  // Texture2
    1,  // Texture3
    1,  // Texture4
    1,  // Text
    9,  // UiMovie
    1,  // Wav
    1,  // Xml
    7,  // ScriptProject
    1,  // Cs
    1,  // Video
];

const VERSION_TABLE_FILE: &str = "version_data.dat";

pub fn cooker_version() -> u32 {
    COOKER_VERSION
}

pub fn data_version(file_type: FileType) -> u32 {
    DATA_VERSIONS
        .get(file_type.index())
        .copied()
        .unwrap_or(0)
}

/// Whether `file_type` is cooked one source to one output with no
/// dependency record.
///
/// Effects flatten their whole include graph into one record, script
/// projects depend on many scripts, sound projects stand in for a directory
/// of banks, and UI movies depend on their extracted images.
pub fn is_one_to_one_type(file_type: FileType) -> bool {
    !matches!(
        file_type,
        FileType::Effect | FileType::ScriptProject | FileType::SoundProject | FileType::UiMovie
    )
}

/// Current versions used when writing and checking records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versions {
    pub cooker: u32,
    pub data: [u32; FILE_TYPE_COUNT],
}

impl Default for Versions {
    fn default() -> Self {
        Self {
            cooker: COOKER_VERSION,
            data: DATA_VERSIONS,
        }
    }
}

impl Versions {
    pub fn data_version(&self, file_type: FileType) -> u32 {
        self.data.get(file_type.index()).copied().unwrap_or(0)
    }

    pub fn with_cooker(self, cooker: u32) -> Self {
        Self { cooker, ..self }
    }

    pub fn with_data(mut self, file_type: FileType, version: u32) -> Self {
        self.data[file_type.index()] = version;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct VersionPair {
    data: u32,
    cooker: u32,
}

/// Persisted one-to-one version table, one pair per file type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct VersionTable {
    entries: Vec<VersionPair>,
}

impl VersionTable {
    fn current(versions: &Versions) -> Self {
        Self {
            entries: versions
                .data
                .iter()
                .map(|&data| VersionPair {
                    data,
                    cooker: versions.cooker,
                })
                .collect(),
        }
    }

    fn matches(&self, file_type: FileType, versions: &Versions) -> bool {
        self.entries
            .get(file_type.index())
            .is_some_and(|e| e.data == versions.data_version(file_type) && e.cooker == versions.cooker)
    }

    fn is_current(&self, versions: &Versions) -> bool {
        FileType::all()
            .iter()
            .copied()
            .filter(|t| is_one_to_one_type(*t))
            .all(|t| self.matches(t, versions))
    }
}

/// Result of reconciling the one-to-one version table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionOutcome {
    /// No readable table existed; a current one was written.
    Created,
    /// The table matched the current versions.
    UpToDate,
    /// Out-of-date cooked files were deleted and the table rewritten.
    Fixed { deleted: usize },
}

pub fn version_table_path() -> AssetPath {
    AssetPath::content(VERSION_TABLE_FILE)
}

fn load_table(fs: &dyn FileSystem, platform: Platform) -> Option<VersionTable> {
    let bytes = fs.read_for_platform(platform, version_table_path()).ok()?;
    let table: VersionTable = match bincode::deserialize(&bytes) {
        Ok(table) => table,
        Err(e) => {
            warn!(platform = %platform, error = %e, "Version table is corrupt");
            return None;
        }
    };
    if table.entries.len() != FILE_TYPE_COUNT {
        warn!(
            platform = %platform,
            entries = table.entries.len(),
            "Version table has the wrong number of entries"
        );
        return None;
    }
    Some(table)
}

fn save_table(fs: &dyn FileSystem, platform: Platform, versions: &Versions) -> Result<(), StorageError> {
    let table = VersionTable::current(versions);
    let bytes = bincode::serialize(&table).map_err(|e| StorageError::Serialization {
        path: version_table_path().to_string(),
        reason: e.to_string(),
    })?;
    fs.write_for_platform(platform, version_table_path(), &bytes)
}

/// Reconcile the one-to-one version table for `platform`.
///
/// A missing or unreadable table is replaced with the current versions and
/// nothing is deleted: an unneeded recook costs more than a skipped one,
/// which can be forced by bumping the data version again. On a mismatch,
/// cooked files of every out-of-date one-to-one type are deleted; the table
/// is rewritten only if all deletions succeed.
pub fn process_one_to_one_versions(
    fs: &dyn FileSystem,
    platform: Platform,
    versions: &Versions,
) -> Result<VersionOutcome, StorageError> {
    let Some(table) = load_table(fs, platform) else {
        save_table(fs, platform, versions)?;
        info!(platform = %platform, "Wrote fresh one-to-one version table");
        return Ok(VersionOutcome::Created);
    };

    if table.is_current(versions) {
        debug!(platform = %platform, "One-to-one version table is current");
        return Ok(VersionOutcome::UpToDate);
    }

    let table_path = version_table_path();
    let mut deleted = 0usize;
    for file in fs.list_for_platform(platform, GameDirectory::Content) {
        let file_type = file.file_type();
        if file == table_path || file_type == FileType::Unknown || !is_one_to_one_type(file_type) {
            continue;
        }
        if table.matches(file_type, versions) {
            continue;
        }
        fs.delete_for_platform(platform, file)?;
        deleted += 1;
    }

    save_table(fs, platform, versions)?;
    info!(platform = %platform, deleted, "Deleted out-of-date one-to-one cooked files");
    Ok(VersionOutcome::Fixed { deleted })
}
