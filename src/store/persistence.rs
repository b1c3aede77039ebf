//! JSON persistence for output records
//!
//! Each record lives next to its cooked output in the platform's cooked
//! tree, named after the cooked file plus `.json`
//! (`ui/foo.sif0` → `ui/foo.sif0.json`).

use super::{OutputRecord, RecordStore};
use crate::error::StorageError;
use crate::fs::FileSystem;
use crate::path::AssetPath;
use crate::types::Platform;
use std::sync::Arc;

pub struct JsonRecordStore {
    fs: Arc<dyn FileSystem>,
    platform: Platform,
}

impl JsonRecordStore {
    pub fn new(fs: Arc<dyn FileSystem>, platform: Platform) -> Self {
        Self { fs, platform }
    }
}

impl RecordStore for JsonRecordStore {
    fn get(&self, output: AssetPath) -> Result<Option<OutputRecord>, StorageError> {
        let location = output.record_path();
        let bytes = match self.fs.read_for_platform(self.platform, location) {
            Ok(bytes) => bytes,
            Err(StorageError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| StorageError::InvalidRecord {
                path: location.to_string(),
                reason: e.to_string(),
            })
    }

    fn put(&self, output: AssetPath, record: &OutputRecord) -> Result<(), StorageError> {
        let location = output.record_path();
        let json = serde_json::to_vec_pretty(record).map_err(|e| StorageError::Serialization {
            path: location.to_string(),
            reason: e.to_string(),
        })?;
        self.fs.write_for_platform(self.platform, location, &json)
    }
}
