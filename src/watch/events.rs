//! Change events delivered to the database.

use crate::path::AssetPath;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
    Renamed,
}

/// One observed change. `prior` is set for renames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileChange {
    pub prior: Option<AssetPath>,
    pub path: AssetPath,
    pub kind: ChangeKind,
}

impl FileChange {
    pub fn added(path: AssetPath) -> Self {
        Self {
            prior: None,
            path,
            kind: ChangeKind::Added,
        }
    }

    pub fn modified(path: AssetPath) -> Self {
        Self {
            prior: None,
            path,
            kind: ChangeKind::Modified,
        }
    }

    pub fn removed(path: AssetPath) -> Self {
        Self {
            prior: None,
            path,
            kind: ChangeKind::Removed,
        }
    }

    pub fn renamed(from: AssetPath, to: AssetPath) -> Self {
        Self {
            prior: Some(from),
            path: to,
            kind: ChangeKind::Renamed,
        }
    }

    /// Paths touched by this change: the prior path first, then the new path
    /// unless it is the same.
    pub fn paths(&self) -> impl Iterator<Item = AssetPath> {
        let path = self.path;
        let prior = self.prior;
        prior
            .into_iter()
            .chain(std::iter::once(path).filter(move |p| Some(*p) != prior))
    }
}

/// Callback invoked for every change, possibly from a watcher thread
pub type ChangeHandler = Arc<dyn Fn(FileChange) + Send + Sync>;
