//! Freshness check
//!
//! Decides whether a cooked output still matches what it was cooked from.
//! The check compares, in order: record presence, cooker and data versions,
//! the cooked output's own timestamp, then every sibling, source, and
//! directory dependency. The first three are global: they make the output
//! stale without naming a dependency.

use crate::fs::FileSystem;
use crate::path::AssetPath;
use crate::store::{RecordStore, RecordTable};
use crate::types::{Platform, Timestamp};
use crate::versions::Versions;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Why an output needs to be cooked again
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaleReason {
    NoRecord,
    CookerVersion { recorded: u32, current: u32 },
    DataVersion { recorded: u32, current: u32 },
    OutputChanged {
        recorded: Timestamp,
        current: Option<Timestamp>,
    },
    /// Dependencies whose timestamp or file count no longer matches
    Dependencies(Vec<AssetPath>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    UpToDate,
    Stale(StaleReason),
}

impl Verdict {
    pub fn is_up_to_date(&self) -> bool {
        matches!(self, Verdict::UpToDate)
    }

    /// Dependencies named by the verdict. Empty when up to date and when
    /// the staleness is global.
    pub fn changed_dependencies(&self) -> &[AssetPath] {
        match self {
            Verdict::Stale(StaleReason::Dependencies(paths)) => paths,
            _ => &[],
        }
    }

    /// Stale for a reason that does not name a dependency
    pub fn is_global(&self) -> bool {
        matches!(self, Verdict::Stale(reason) if !matches!(reason, StaleReason::Dependencies(_)))
    }
}

/// Cached verdicts, keyed by output
#[derive(Debug, Default)]
pub struct FreshnessCache {
    entries: HashMap<AssetPath, bool>,
}

impl FreshnessCache {
    pub fn get(&self, output: &AssetPath) -> Option<bool> {
        self.entries.get(output).copied()
    }

    pub fn set(&mut self, output: AssetPath, up_to_date: bool) {
        self.entries.insert(output, up_to_date);
    }

    pub fn invalidate(&mut self, output: &AssetPath) -> bool {
        self.entries.remove(output).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything a check reads besides the record table
pub struct FreshnessCheck<'a> {
    pub fs: &'a dyn FileSystem,
    pub store: &'a dyn RecordStore,
    pub platform: Platform,
    pub versions: &'a Versions,
}

impl FreshnessCheck<'_> {
    /// Make sure `output`'s record is in `table` if one is persisted.
    ///
    /// A record that exists but cannot be read counts as absent.
    pub fn resolve_record(&self, table: &mut RecordTable, output: AssetPath) -> bool {
        if table.contains(&output) {
            return true;
        }
        match self.store.get(output) {
            Ok(Some(record)) => {
                debug!(output = %output, "Loaded record from disk");
                table.replace(output, record);
                true
            }
            Ok(None) => false,
            Err(e) => {
                warn!(output = %output, error = %e, "Ignoring unreadable record");
                false
            }
        }
    }

    pub fn evaluate(&self, table: &mut RecordTable, output: AssetPath) -> Verdict {
        if !self.resolve_record(table, output) {
            return Verdict::Stale(StaleReason::NoRecord);
        }
        let Some(record) = table.get(&output) else {
            return Verdict::Stale(StaleReason::NoRecord);
        };

        if record.cooker_version != self.versions.cooker {
            return Verdict::Stale(StaleReason::CookerVersion {
                recorded: record.cooker_version,
                current: self.versions.cooker,
            });
        }
        let current_data = self.versions.data_version(output.file_type());
        if record.data_version != current_data {
            return Verdict::Stale(StaleReason::DataVersion {
                recorded: record.data_version,
                current: current_data,
            });
        }

        let cooked = self.fs.modified_time_for_platform(self.platform, output);
        if cooked != Some(record.cooked_timestamp) {
            return Verdict::Stale(StaleReason::OutputChanged {
                recorded: record.cooked_timestamp,
                current: cooked,
            });
        }

        let mut changed = Vec::new();
        for sibling in &record.siblings {
            if self.fs.modified_time_for_platform(self.platform, sibling.path) != Some(sibling.timestamp) {
                changed.push(sibling.path);
            }
        }
        for source in &record.sources {
            if self.fs.modified_time_in_source(source.path) != Some(source.timestamp) {
                changed.push(source.path);
            }
        }
        for dir in &record.directories {
            if self.fs.recursive_file_count(dir.path) != dir.file_count {
                changed.push(dir.path);
            }
        }

        if changed.is_empty() {
            Verdict::UpToDate
        } else {
            Verdict::Stale(StaleReason::Dependencies(changed))
        }
    }
}
