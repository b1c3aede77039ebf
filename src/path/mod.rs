//! Asset paths
//!
//! An [`AssetPath`] identifies a file independently of which tree (source or
//! a platform's cooked output) it lives in. It packs a root directory, a file
//! type, and an interned relative name, so it is `Copy` and compares and
//! hashes in O(1). Names are lowercased with `/` separators and carry no
//! extension; the extension is derived from the file type and the tree.

mod interner;

pub use interner::{NameId, NameInterner};

use crate::error::ApiError;
use crate::types::{FileType, GameDirectory};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const SCHEME_SEPARATOR: &str = "://";

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetPath {
    directory: GameDirectory,
    file_type: FileType,
    name: NameId,
}

fn normalize_name(name: &str) -> String {
    let name = name.replace('\\', "/").to_lowercase();
    name.trim_matches('/').to_string()
}

/// Split "dir/file.ext" into ("dir/file", ".ext"); the extension must follow
/// the last separator.
fn split_extension(name: &str) -> (&str, &str) {
    let file_start = name.rfind('/').map(|i| i + 1).unwrap_or(0);
    match name[file_start..].rfind('.') {
        Some(dot) if dot > 0 => name.split_at(file_start + dot),
        _ => (name, ""),
    }
}

impl AssetPath {
    /// Build a path from its parts. `name` is normalized and must not carry
    /// the extension of `file_type`.
    pub fn new(directory: GameDirectory, file_type: FileType, name: &str) -> Self {
        let name = normalize_name(name);
        Self {
            directory,
            file_type,
            name: NameInterner::global().intern(&name),
        }
    }

    /// Build a path from a relative filename, deriving the file type from its
    /// extension. Unrecognized extensions stay part of the name with type
    /// `Unknown`.
    pub fn from_filename(directory: GameDirectory, filename: &str) -> Self {
        let normalized = normalize_name(filename);
        let (stem, extension) = split_extension(&normalized);
        match FileType::from_extension(extension) {
            FileType::Unknown => Self::new(directory, FileType::Unknown, &normalized),
            file_type => Self::new(directory, file_type, stem),
        }
    }

    /// Content-rooted path from a relative filename, e.g. `"ui/foo.png"`.
    pub fn content(filename: &str) -> Self {
        Self::from_filename(GameDirectory::Content, filename)
    }

    /// Content-rooted directory path. A non-`Unknown` type restricts the
    /// directory to files of that type when counting or matching.
    pub fn content_directory(name: &str, file_type: FileType) -> Self {
        Self::new(GameDirectory::Content, file_type, name)
    }

    /// Parse the URL form, e.g. `content://ui/foo.png`. A string with no
    /// scheme is taken as content-relative.
    pub fn parse(url: &str) -> Result<Self, ApiError> {
        match url.split_once(SCHEME_SEPARATOR) {
            Some((scheme, rest)) => {
                let directory = GameDirectory::from_scheme(scheme)
                    .ok_or_else(|| ApiError::InvalidPath(format!("unknown scheme in {}", url)))?;
                Ok(Self::from_filename(directory, rest))
            }
            None if url.trim().is_empty() => {
                Err(ApiError::InvalidPath("empty path".to_string()))
            }
            None => Ok(Self::content(url)),
        }
    }

    /// Look up an existing path without interning a new name.
    pub fn lookup(directory: GameDirectory, file_type: FileType, name: &str) -> Option<Self> {
        NameInterner::global()
            .lookup(name)
            .map(|name| Self {
                directory,
                file_type,
                name,
            })
    }

    pub fn directory(&self) -> GameDirectory {
        self.directory
    }

    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    /// Relative name without extension
    pub fn name(&self) -> &'static str {
        NameInterner::global().resolve(self.name)
    }

    pub fn name_id(&self) -> NameId {
        self.name
    }

    pub fn with_type(&self, file_type: FileType) -> Self {
        Self { file_type, ..*self }
    }

    /// Collapse texture mip-level types to `Texture0`; all other paths are
    /// returned unchanged.
    pub fn normalized(&self) -> Self {
        if self.file_type.is_texture() {
            self.with_type(FileType::Texture0)
        } else {
            *self
        }
    }

    /// Relative filename in the source tree
    pub fn source_relative(&self) -> String {
        format!("{}{}", self.name(), self.file_type.source_extension())
    }

    /// Relative filename in a cooked tree
    pub fn cooked_relative(&self) -> String {
        format!("{}{}", self.name(), self.file_type.cooked_extension())
    }

    /// Location of the persisted freshness record for this output: the
    /// cooked filename, extension included, as a JSON file.
    pub fn record_path(&self) -> Self {
        Self::new(self.directory, FileType::Json, &self.cooked_relative())
    }

    /// Whether this names a persisted record, i.e. a JSON file whose name
    /// still ends in a cooked extension.
    pub fn is_record_path(&self) -> bool {
        self.file_type == FileType::Json
            && FileType::from_extension(split_extension(self.name()).1) != FileType::Unknown
    }

    /// Names of every ancestor directory, nearest first, ending with the
    /// root (`""`).
    pub fn ancestor_names(&self) -> Vec<&'static str> {
        let name = self.name();
        let mut out = Vec::new();
        let mut rest = name;
        while let Some(i) = rest.rfind('/') {
            rest = &rest[..i];
            out.push(rest);
        }
        if !name.is_empty() {
            out.push("");
        }
        out
    }

    /// Serialized URL form
    pub fn url(&self) -> String {
        format!(
            "{}{}{}",
            self.directory.scheme(),
            SCHEME_SEPARATOR,
            self.source_relative()
        )
    }
}

impl fmt::Display for AssetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}

impl fmt::Debug for AssetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssetPath({}, {:?})", self.url(), self.file_type)
    }
}

impl FromStr for AssetPath {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssetPath::parse(s)
    }
}

impl Serialize for AssetPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.url())
    }
}

impl<'de> Deserialize<'de> for AssetPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        AssetPath::parse(&s).map_err(serde::de::Error::custom)
    }
}
