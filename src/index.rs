//! Dependency Index
//!
//! Reverse edges from the files an output was cooked from back to the
//! output. Two maps are kept: plain file dependencies (sources and siblings)
//! and directory dependencies, which match any file below the directory.
//! The index only ever changes together with the record table that owns it,
//! see [`RecordTable`](crate::store::RecordTable).

use crate::path::AssetPath;
use crate::store::OutputRecord;
use crate::types::FileType;
use std::collections::{HashMap, HashSet};

/// Reverse dependency index: dependency → outputs
#[derive(Debug, Default)]
pub struct DependencyIndex {
    /// Index: source or sibling path → outputs that declared it
    files: HashMap<AssetPath, HashSet<AssetPath>>,
    /// Index: directory path → outputs that declared it
    directories: HashMap<AssetPath, HashSet<AssetPath>>,
}

fn insert_edge(map: &mut HashMap<AssetPath, HashSet<AssetPath>>, key: AssetPath, output: AssetPath) {
    map.entry(key).or_default().insert(output);
}

fn remove_edge(map: &mut HashMap<AssetPath, HashSet<AssetPath>>, key: &AssetPath, output: &AssetPath) {
    if let Some(outputs) = map.get_mut(key) {
        outputs.remove(output);
        if outputs.is_empty() {
            map.remove(key);
        }
    }
}

impl DependencyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every edge declared by `record` for `output`.
    pub fn add_record(&mut self, output: AssetPath, record: &OutputRecord) {
        for dep in record.sources.iter().chain(record.siblings.iter()) {
            insert_edge(&mut self.files, dep.path, output);
        }
        for dir in &record.directories {
            insert_edge(&mut self.directories, dir.path, output);
        }
    }

    /// Remove every edge declared by `record` for `output`.
    pub fn remove_record(&mut self, output: AssetPath, record: &OutputRecord) {
        for dep in record.sources.iter().chain(record.siblings.iter()) {
            remove_edge(&mut self.files, &dep.path, &output);
        }
        for dir in &record.directories {
            remove_edge(&mut self.directories, &dir.path, &output);
        }
    }

    /// Outputs that may be stale when `path` changes.
    ///
    /// Includes direct dependents of `path`, plus dependents of every tracked
    /// directory that contains `path` (same root directory, and either an
    /// untyped directory or one typed like `path`). Outputs that are `path`
    /// itself, modulo texture normalization, are left out. The result is
    /// deduplicated and sorted by URL.
    pub fn dependents(&self, path: AssetPath) -> Vec<AssetPath> {
        let mut found: HashSet<AssetPath> = HashSet::new();

        if let Some(outputs) = self.files.get(&path) {
            found.extend(outputs.iter().copied());
        }

        if !self.directories.is_empty() {
            let mut types = vec![FileType::Unknown];
            if path.file_type() != FileType::Unknown {
                types.push(path.file_type());
            }
            let names = std::iter::once(path.name()).chain(path.ancestor_names());
            for name in names {
                for file_type in &types {
                    let Some(dir) = AssetPath::lookup(path.directory(), *file_type, name) else {
                        continue;
                    };
                    if let Some(outputs) = self.directories.get(&dir) {
                        found.extend(outputs.iter().copied());
                    }
                }
            }
        }

        let normalized = path.normalized();
        let mut out: Vec<AssetPath> = found
            .into_iter()
            .filter(|o| o.normalized() != normalized)
            .collect();
        out.sort_by_key(|p| p.url());
        out
    }

    /// Whether any output declared `directory` as a directory dependency.
    pub fn is_tracked_directory(&self, directory: &AssetPath) -> bool {
        self.directories.contains_key(directory)
    }

    /// Total number of reverse edges
    pub fn edge_count(&self) -> usize {
        self.files.values().map(HashSet::len).sum::<usize>()
            + self.directories.values().map(HashSet::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.directories.is_empty()
    }

    /// Cross-check the index against the records it was built from.
    ///
    /// Every edge must be backed by a declaration in its output's record,
    /// every declaration must have an edge, and no key may map to an empty
    /// set. Returns a description of the first problem found.
    pub fn verify(&self, records: &HashMap<AssetPath, OutputRecord>) -> Result<(), String> {
        for (map, kind) in [(&self.files, "file"), (&self.directories, "directory")] {
            for (key, outputs) in map {
                if outputs.is_empty() {
                    return Err(format!("empty {} entry for {}", kind, key));
                }
                for output in outputs {
                    let record = records.get(output).ok_or_else(|| {
                        format!("dangling {} edge {} -> {} (no record)", kind, key, output)
                    })?;
                    let declared = if kind == "file" {
                        record.sources.iter().chain(record.siblings.iter()).any(|s| s.path == *key)
                    } else {
                        record.directories.iter().any(|d| d.path == *key)
                    };
                    if !declared {
                        return Err(format!(
                            "stale {} edge {} -> {} (not declared by record)",
                            kind, key, output
                        ));
                    }
                }
            }
        }

        for (output, record) in records {
            for dep in record.sources.iter().chain(record.siblings.iter()) {
                if !self.files.get(&dep.path).is_some_and(|o| o.contains(output)) {
                    return Err(format!("missing file edge {} -> {}", dep.path, output));
                }
            }
            for dir in &record.directories {
                if !self.directories.get(&dir.path).is_some_and(|o| o.contains(output)) {
                    return Err(format!("missing directory edge {} -> {}", dir.path, output));
                }
            }
        }

        Ok(())
    }
}
