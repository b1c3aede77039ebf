//! cookdb: Cooked Asset Freshness Tracking
//!
//! Records which sources, sibling outputs, and directories each cooked asset
//! was built from, and answers whether the asset is still up to date for a
//! platform. A reverse dependency index and a change notifier keep cached
//! answers honest as files change.

pub mod config;
pub mod database;
pub mod error;
pub mod freshness;
pub mod fs;
pub mod index;
pub mod logging;
pub mod path;
pub mod store;
pub mod tooling;
pub mod types;
pub mod versions;
pub mod watch;

pub use database::{CookDatabase, DatabaseOptions};
pub use error::{ApiError, StorageError};
pub use freshness::{StaleReason, Verdict};
pub use path::AssetPath;
pub use store::{DependencySpec, OutputRecord};
pub use types::{FileType, GameDirectory, Platform};
