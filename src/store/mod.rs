//! OutputRecord Store
//!
//! Per-output freshness records and the in-memory table that holds them.
//! The table owns the reverse [`DependencyIndex`] so the two cannot drift:
//! every insert, replace, or eviction rewrites the output's edges in the
//! same call.

pub mod persistence;

use crate::error::StorageError;
use crate::index::DependencyIndex;
use crate::path::AssetPath;
use crate::types::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Snapshot of one file dependency's modified time at cook time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SourceRef {
    #[serde(rename = "Source")]
    pub path: AssetPath,
    pub timestamp: Timestamp,
}

/// Snapshot of a directory dependency's recursive file count at cook time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DirectoryRef {
    #[serde(rename = "Source")]
    pub path: AssetPath,
    pub file_count: u32,
}

/// OutputRecord: what one cooked output was built from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OutputRecord {
    /// Modified time of the cooked output when the record was written
    pub cooked_timestamp: Timestamp,
    /// When the record itself was committed
    #[serde(default)]
    pub record_timestamp: Timestamp,
    pub cooker_version: u32,
    pub data_version: u32,
    pub sources: Vec<SourceRef>,
    /// Other cooked files produced alongside the output
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub siblings: Vec<SourceRef>,
    #[serde(
        default,
        rename = "DirectorySources",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub directories: Vec<DirectoryRef>,
}

/// Caller-supplied dependency declaration for `update_metadata`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependencySpec {
    pub path: AssetPath,
    pub is_directory: bool,
    /// Only needed by debug builds. Currently tracked like any other
    /// dependency.
    pub debug_only: bool,
    /// A cooked file produced next to the output, stat'ed in the cooked tree
    pub is_sibling: bool,
}

impl DependencySpec {
    pub fn source(path: AssetPath) -> Self {
        Self {
            path,
            is_directory: false,
            debug_only: false,
            is_sibling: false,
        }
    }

    pub fn sibling(path: AssetPath) -> Self {
        Self {
            is_sibling: true,
            ..Self::source(path)
        }
    }

    pub fn directory(path: AssetPath) -> Self {
        Self {
            is_directory: true,
            ..Self::source(path)
        }
    }

    pub fn debug_only(self) -> Self {
        Self {
            debug_only: true,
            ..self
        }
    }
}

/// Persistent record store interface
pub trait RecordStore: Send + Sync {
    /// Read the persisted record for `output`. `Ok(None)` means no record
    /// exists; `Err` means one exists but could not be read or parsed.
    fn get(&self, output: AssetPath) -> Result<Option<OutputRecord>, StorageError>;

    fn put(&self, output: AssetPath, record: &OutputRecord) -> Result<(), StorageError>;
}

/// In-memory records plus their reverse index
#[derive(Debug, Default)]
pub struct RecordTable {
    records: HashMap<AssetPath, OutputRecord>,
    index: DependencyIndex,
}

impl RecordTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, output: &AssetPath) -> Option<&OutputRecord> {
        self.records.get(output)
    }

    pub fn contains(&self, output: &AssetPath) -> bool {
        self.records.contains_key(output)
    }

    /// Insert or replace `output`'s record. All of the previous record's
    /// edges are removed before the new ones are added.
    pub fn replace(&mut self, output: AssetPath, record: OutputRecord) -> Option<OutputRecord> {
        let previous = self.evict(output);
        self.index.add_record(output, &record);
        self.records.insert(output, record);
        previous
    }

    /// Drop `output`'s record and its edges.
    pub fn evict(&mut self, output: AssetPath) -> Option<OutputRecord> {
        let previous = self.records.remove(&output)?;
        self.index.remove_record(output, &previous);
        Some(previous)
    }

    pub fn dependents(&self, path: AssetPath) -> Vec<AssetPath> {
        self.index.dependents(path)
    }

    pub fn index(&self) -> &DependencyIndex {
        &self.index
    }

    pub fn verify(&self) -> Result<(), String> {
        self.index.verify(&self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
