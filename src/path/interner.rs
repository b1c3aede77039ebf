//! Process-wide relative-name interner backing [`AssetPath`](super::AssetPath).

use lasso::ThreadedRodeo;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Interned relative filename.
///
/// A `u32` index into the name table: O(1) equality, hashing, and copying.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct NameId(u32);

impl NameId {
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

// SAFETY: `NameId` wraps a `u32`, which always fits a `usize` on supported
// targets; `try_from_usize` rejects values that do not fit in `u32`.
unsafe impl lasso::Key for NameId {
    fn into_usize(self) -> usize {
        self.0 as usize
    }

    fn try_from_usize(int: usize) -> Option<Self> {
        u32::try_from(int).ok().map(NameId)
    }
}

/// Deduplicating name table shared by every asset path in the process.
///
/// Names are never removed; the table grows with the number of distinct
/// relative filenames seen, which is bounded by the asset tree.
pub struct NameInterner {
    rodeo: ThreadedRodeo<NameId>,
}

static NAMES: LazyLock<NameInterner> = LazyLock::new(NameInterner::new);

impl NameInterner {
    fn new() -> Self {
        Self {
            rodeo: ThreadedRodeo::new(),
        }
    }

    /// The process-wide table
    pub fn global() -> &'static NameInterner {
        &NAMES
    }

    pub fn intern(&self, name: &str) -> NameId {
        self.rodeo.get_or_intern(name)
    }

    /// Look up a name without adding it.
    pub fn lookup(&self, name: &str) -> Option<NameId> {
        self.rodeo.get(name)
    }

    pub fn resolve(&'static self, id: NameId) -> &'static str {
        self.rodeo.resolve(&id)
    }

    pub fn len(&self) -> usize {
        self.rodeo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rodeo.is_empty()
    }
}
