//! OS file watcher over the source tree and one platform's cooked tree.

use super::events::{ChangeHandler, FileChange};
use super::ChangeNotifier;
use crate::error::ApiError;
use crate::fs::DiskFileSystem;
use crate::path::AssetPath;
use crate::types::Platform;
use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use tracing::{debug, info, warn};

/// Maps raw OS events to [`FileChange`]s
#[derive(Debug, Clone)]
struct EventMapper {
    disk: DiskFileSystem,
    platform: Platform,
}

impl EventMapper {
    /// Asset path of a watched file. Record files in the cooked tree are
    /// the database's own writes and map to nothing.
    fn resolve(&self, absolute: &Path) -> Option<AssetPath> {
        match self.disk.resolve_cooked(self.platform, absolute) {
            Some(path) if path.is_record_path() => None,
            Some(path) => Some(path),
            None => self.disk.resolve_source(absolute),
        }
    }

    fn convert_event(&self, event: &Event) -> Option<FileChange> {
        let first = || event.paths.first().and_then(|p| self.resolve(p));
        match event.kind {
            EventKind::Create(_) => first().map(FileChange::added),
            EventKind::Modify(ModifyKind::Name(mode)) => {
                if event.paths.len() >= 2 {
                    let from = self.resolve(&event.paths[0]);
                    let to = self.resolve(&event.paths[1]);
                    match (from, to) {
                        (Some(from), Some(to)) => Some(FileChange::renamed(from, to)),
                        (Some(from), None) => Some(FileChange::removed(from)),
                        (None, Some(to)) => Some(FileChange::added(to)),
                        (None, None) => None,
                    }
                } else {
                    match mode {
                        RenameMode::From => first().map(FileChange::removed),
                        RenameMode::To => first().map(FileChange::added),
                        _ => first().map(FileChange::modified),
                    }
                }
            }
            EventKind::Modify(_) => first().map(FileChange::modified),
            EventKind::Remove(_) => first().map(FileChange::removed),
            _ => None,
        }
    }
}

/// [`ChangeNotifier`] backed by `notify`'s recommended watcher
pub struct NotifyWatcher {
    mapper: EventMapper,
    watcher: Option<RecommendedWatcher>,
}

impl NotifyWatcher {
    pub fn new(disk: DiskFileSystem, platform: Platform) -> Self {
        Self {
            mapper: EventMapper { disk, platform },
            watcher: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.watcher.is_some()
    }
}

impl ChangeNotifier for NotifyWatcher {
    fn register(&mut self, handler: ChangeHandler) -> Result<(), ApiError> {
        let mapper = self.mapper.clone();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Some(change) = mapper.convert_event(&event) {
                    debug!(path = %change.path, kind = ?change.kind, "File change");
                    handler(change);
                }
            }
            Err(e) => warn!("Watch error: {}", e),
        })?;

        let source = self.mapper.disk.source_dir().to_path_buf();
        let cooked = self
            .mapper
            .disk
            .cooked_dir()
            .join(self.mapper.platform.name());
        std::fs::create_dir_all(&cooked).map_err(|e| {
            ApiError::WatchError(format!("Failed to create {}: {}", cooked.display(), e))
        })?;

        watcher.watch(&source, RecursiveMode::Recursive)?;
        watcher.watch(&cooked, RecursiveMode::Recursive)?;
        info!(source = ?source, cooked = ?cooked, "Watching asset trees");

        self.watcher = Some(watcher);
        Ok(())
    }

    fn unregister(&mut self) {
        if self.watcher.take().is_some() {
            debug!("Stopped watching asset trees");
        }
    }
}
