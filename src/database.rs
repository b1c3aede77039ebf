//! Cook database facade
//!
//! [`CookDatabase`] answers whether a cooked output is still fresh for one
//! platform, records what each output was cooked from, and invalidates its
//! answers when files change. All state sits behind one mutex that every
//! public call holds for its whole duration, disk reads included. Change
//! events arrive through a [`ChangeNotifier`] and take the same lock.

use crate::config::CookDbConfig;
use crate::error::ApiError;
use crate::freshness::{FreshnessCache, FreshnessCheck, Verdict};
use crate::fs::{DiskFileSystem, FileSystem};
use crate::path::AssetPath;
use crate::store::persistence::JsonRecordStore;
use crate::store::{DependencySpec, DirectoryRef, OutputRecord, RecordStore, RecordTable, SourceRef};
use crate::types::{FileType, Platform};
use crate::versions::{self, Versions};
use crate::watch::{ChangeHandler, ChangeNotifier, FileChange, ManualNotifier, NotifyWatcher};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::{Arc, Weak};
use tracing::{debug, info, warn};

/// Construction options
#[derive(Debug, Clone, Default)]
pub struct DatabaseOptions {
    /// Reconcile the one-to-one version table at startup, deleting cooked
    /// files whose type version changed.
    pub process_one_to_one_versions: bool,
    pub versions: Versions,
}

#[derive(Debug, Default)]
struct State {
    records: RecordTable,
    up_to_date: FreshnessCache,
    changed: HashSet<AssetPath>,
}

/// Everything the change handler needs, shared with the facade
struct Shared {
    platform: Platform,
    fs: Arc<dyn FileSystem>,
    store: JsonRecordStore,
    versions: Versions,
    state: Mutex<State>,
}

impl Shared {
    fn check(&self) -> FreshnessCheck<'_> {
        FreshnessCheck {
            fs: self.fs.as_ref(),
            store: &self.store,
            platform: self.platform,
            versions: &self.versions,
        }
    }

    fn evaluate(&self, state: &mut State, output: AssetPath) -> Verdict {
        let verdict = self.check().evaluate(&mut state.records, output);
        state.up_to_date.set(output, verdict.is_up_to_date());
        debug!(output = %output, ?verdict, "Evaluated freshness");
        verdict
    }

    fn apply_change(&self, change: FileChange) {
        let mut state = self.state.lock();
        for path in change.paths() {
            self.invalidate_path(&mut state, path);
        }
    }

    /// Drop every cached verdict derived from `path` and mark it changed.
    ///
    /// Loaded records of a changed output stay in the table with their
    /// edges; they are only swapped for the persisted copy when that differs.
    fn invalidate_path(&self, state: &mut State, path: AssetPath) {
        state.changed.insert(path);

        let variants: Vec<AssetPath> = if path.file_type().is_texture() {
            FileType::texture_types()
                .iter()
                .map(|t| path.with_type(*t))
                .collect()
        } else {
            vec![path]
        };

        for variant in variants {
            state.up_to_date.invalidate(&variant);
            if state.records.contains(&variant) {
                self.refresh_record(state, variant);
            }
        }

        let dependents = state.records.dependents(path.normalized());
        for dependent in &dependents {
            state.up_to_date.invalidate(dependent);
        }
        debug!(path = %path, dependents = dependents.len(), "Invalidated change");
    }

    fn refresh_record(&self, state: &mut State, output: AssetPath) {
        match self.store.get(output) {
            Ok(Some(record)) => {
                if state.records.get(&output) != Some(&record) {
                    state.records.replace(output, record);
                    debug!(output = %output, "Reloaded record");
                }
            }
            Ok(None) => {}
            Err(e) => warn!(output = %output, error = %e, "Keeping loaded record"),
        }
    }
}

/// Freshness database for one platform's cooked outputs
pub struct CookDatabase {
    shared: Arc<Shared>,
    notifier: Mutex<Box<dyn ChangeNotifier>>,
}

impl CookDatabase {
    pub fn new(
        platform: Platform,
        options: DatabaseOptions,
        fs: Arc<dyn FileSystem>,
        mut notifier: Box<dyn ChangeNotifier>,
    ) -> Result<Self, ApiError> {
        if options.process_one_to_one_versions {
            match versions::process_one_to_one_versions(fs.as_ref(), platform, &options.versions) {
                Ok(outcome) => debug!(platform = %platform, ?outcome, "Processed one-to-one versions"),
                Err(e) => warn!(platform = %platform, error = %e, "Failed to process one-to-one versions"),
            }
        }

        let shared = Arc::new(Shared {
            platform,
            store: JsonRecordStore::new(fs.clone(), platform),
            fs,
            versions: options.versions,
            state: Mutex::new(State::default()),
        });

        let weak: Weak<Shared> = Arc::downgrade(&shared);
        let handler: ChangeHandler = Arc::new(move |change: FileChange| {
            if let Some(shared) = weak.upgrade() {
                shared.apply_change(change);
            }
        });
        notifier.register(handler)?;

        info!(platform = %platform, "Cook database ready");
        Ok(Self {
            shared,
            notifier: Mutex::new(notifier),
        })
    }

    /// Open a disk-backed database from configuration. The OS watcher is used
    /// when `config.watch` is set; otherwise changes must be reported through
    /// [`CookDatabase::manual_on_file_change`].
    pub fn from_config(config: &CookDbConfig) -> Result<Self, ApiError> {
        let disk = DiskFileSystem::new(&config.source_dir, &config.cooked_dir);
        let notifier: Box<dyn ChangeNotifier> = if config.watch {
            Box::new(NotifyWatcher::new(disk.clone(), config.platform))
        } else {
            Box::new(ManualNotifier::new())
        };
        let options = DatabaseOptions {
            process_one_to_one_versions: config.process_one_to_one_versions,
            versions: Versions::default(),
        };
        Self::new(config.platform, options, Arc::new(disk), notifier)
    }

    pub fn platform(&self) -> Platform {
        self.shared.platform
    }

    pub fn is_one_to_one_type(file_type: FileType) -> bool {
        versions::is_one_to_one_type(file_type)
    }

    pub fn cooker_version() -> u32 {
        versions::cooker_version()
    }

    pub fn data_version(file_type: FileType) -> u32 {
        versions::data_version(file_type)
    }

    /// Whether `output` is up to date. Cached verdicts are returned as is.
    pub fn check_up_to_date(&self, output: AssetPath) -> bool {
        let mut state = self.shared.state.lock();
        if let Some(cached) = state.up_to_date.get(&output) {
            return cached;
        }
        self.shared.evaluate(&mut state, output).is_up_to_date()
    }

    /// Like [`check_up_to_date`](Self::check_up_to_date), and on `false`
    /// fills `out` with the dependencies that changed. An empty `out` with
    /// `false` means the output is stale as a whole: no record, a version
    /// change, or the cooked file itself changed.
    pub fn check_up_to_date_with_details(&self, output: AssetPath, out: &mut Vec<AssetPath>) -> bool {
        out.clear();
        let mut state = self.shared.state.lock();
        if state.up_to_date.get(&output) == Some(true) {
            return true;
        }
        let verdict = self.shared.evaluate(&mut state, output);
        out.extend_from_slice(verdict.changed_dependencies());
        verdict.is_up_to_date()
    }

    /// Evaluate `output` without consulting the cache. The cache is updated
    /// with the result.
    pub fn verdict(&self, output: AssetPath) -> Verdict {
        let mut state = self.shared.state.lock();
        self.shared.evaluate(&mut state, output)
    }

    /// Outputs that depend on `path`, directly or through a directory
    /// dependency on one of its ancestors.
    pub fn get_dependents(&self, path: AssetPath, out: &mut Vec<AssetPath>) {
        out.clear();
        out.extend(self.dependents(path));
    }

    pub fn dependents(&self, path: AssetPath) -> Vec<AssetPath> {
        self.shared.state.lock().records.dependents(path.normalized())
    }

    /// Record what `output` was cooked from.
    ///
    /// Dependency timestamps and directory counts are read now. The record
    /// is persisted first; the in-memory record and index only change once
    /// the write succeeded. On failure the previous record is kept, the
    /// cached verdict for `output` is dropped, and the error is returned.
    pub fn update_metadata(
        &self,
        output: AssetPath,
        cooked_timestamp: u64,
        specs: &[DependencySpec],
    ) -> Result<(), ApiError> {
        let shared = &self.shared;
        let mut state = shared.state.lock();

        let mut record = OutputRecord {
            cooked_timestamp,
            record_timestamp: u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0),
            cooker_version: shared.versions.cooker,
            data_version: shared.versions.data_version(output.file_type()),
            ..OutputRecord::default()
        };
        for spec in specs {
            let path = spec.path.normalized();
            if spec.is_directory {
                record.directories.push(DirectoryRef {
                    path,
                    file_count: shared.fs.recursive_file_count(path),
                });
            } else if spec.is_sibling {
                let timestamp = shared.fs.modified_time_for_platform(shared.platform, path);
                record.siblings.push(SourceRef {
                    path,
                    timestamp: timestamp.unwrap_or(0),
                });
            } else {
                let timestamp = shared.fs.modified_time_in_source(path);
                if timestamp.is_none() {
                    debug!(output = %output, source = %path, "Recording missing source");
                }
                record.sources.push(SourceRef {
                    path,
                    timestamp: timestamp.unwrap_or(0),
                });
            }
        }

        if let Err(e) = shared.store.put(output, &record) {
            warn!(output = %output, error = %e, "Failed to write record");
            state.up_to_date.invalidate(&output);
            return Err(e.into());
        }

        state.records.replace(output, record);
        state.up_to_date.set(output, true);
        debug!(output = %output, dependencies = specs.len(), "Updated metadata");
        Ok(())
    }

    /// Process a change to `path` as if the notifier had reported it.
    pub fn manual_on_file_change(&self, path: AssetPath) {
        self.shared.apply_change(FileChange::modified(path));
    }

    /// Whether a change to `path` has been seen since the last
    /// [`take_changed`](Self::take_changed).
    pub fn is_changed(&self, path: AssetPath) -> bool {
        self.shared.state.lock().changed.contains(&path)
    }

    /// Drain the changed set, sorted by URL.
    pub fn take_changed(&self) -> Vec<AssetPath> {
        let mut changed: Vec<AssetPath> = self.shared.state.lock().changed.drain().collect();
        changed.sort_by_key(|p| p.url());
        changed
    }

    /// The record for `output`, loading it from disk if needed.
    pub fn record(&self, output: AssetPath) -> Option<OutputRecord> {
        let mut state = self.shared.state.lock();
        let check = self.shared.check();
        if check.resolve_record(&mut state.records, output) {
            state.records.get(&output).cloned()
        } else {
            None
        }
    }

    /// Cross-check the reverse index against the loaded records.
    pub fn verify_index(&self) -> Result<(), ApiError> {
        self.shared
            .state
            .lock()
            .records
            .verify()
            .map_err(ApiError::IndexInconsistency)
    }

    /// Number of records currently loaded
    pub fn loaded_records(&self) -> usize {
        self.shared.state.lock().records.len()
    }
}

impl Drop for CookDatabase {
    fn drop(&mut self) {
        self.notifier.get_mut().unregister();
    }
}
