//! Error types
//!
//! Queries never surface these: a record that cannot be read is treated as
//! absent. Errors reach callers only from writes, configuration, and watcher
//! setup.

use std::path::PathBuf;
use thiserror::Error;

/// Storage-layer failures reading or writing persisted files
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("I/O error at {path}: {source}")]
    PathIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize record for {path}: {reason}")]
    Serialization { path: String, reason: String },

    #[error("Invalid record for {path}: {reason}")]
    InvalidRecord { path: String, reason: String },

    #[error("Write rejected for {0}")]
    WriteRejected(String),

    #[error("File not found: {0}")]
    NotFound(String),
}

/// Errors returned from the public API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Watch error: {0}")]
    WatchError(String),

    #[error("Invalid asset path: {0}")]
    InvalidPath(String),

    #[error("Dependency index inconsistent: {0}")]
    IndexInconsistency(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<notify::Error> for ApiError {
    fn from(err: notify::Error) -> Self {
        ApiError::WatchError(err.to_string())
    }
}
