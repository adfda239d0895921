//! Library entries and file sets
//!
//! Two entries are "the same song" iff their identities (normalised file
//! stems) are equal, regardless of extension or directory. This relies on
//! stems being unique across the library; the reconciler warns when the
//! source side breaks that assumption.

use mtx_common::config::canonical_extension;
use mtx_common::normalize_path;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One audio file on either side of a transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibraryEntry {
    /// Absolute filesystem path
    pub path: PathBuf,
    /// Normalised file stem used for matching
    pub identity: String,
    /// Lowercase extension without the leading dot
    pub extension: String,
}

impl LibraryEntry {
    /// Build an entry from an absolute path
    ///
    /// Returns `None` when the path has no file stem or no extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let stem = path.file_stem()?.to_string_lossy().into_owned();
        let extension = canonical_extension(&path.extension()?.to_string_lossy());

        Some(Self {
            identity: normalize_path(&stem),
            extension,
            path,
        })
    }

    /// True if this entry is already in `target_extension` format
    pub fn has_extension(&self, target_extension: &str) -> bool {
        self.extension == canonical_extension(target_extension)
    }
}

/// Set of library entries, deduplicated by absolute path
///
/// Iteration is in path order so runs are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSet {
    entries: BTreeMap<PathBuf, LibraryEntry>,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry; returns false if its path is already present
    pub fn insert(&mut self, entry: LibraryEntry) -> bool {
        if self.entries.contains_key(&entry.path) {
            return false;
        }
        self.entries.insert(entry.path.clone(), entry);
        true
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn get(&self, path: &Path) -> Option<&LibraryEntry> {
        self.entries.get(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LibraryEntry> {
        self.entries.values()
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.keys().map(PathBuf::as_path)
    }
}

impl FromIterator<LibraryEntry> for FileSet {
    fn from_iter<I: IntoIterator<Item = LibraryEntry>>(iter: I) -> Self {
        let mut set = FileSet::new();
        for entry in iter {
            set.insert(entry);
        }
        set
    }
}

impl IntoIterator for FileSet {
    type Item = LibraryEntry;
    type IntoIter = std::collections::btree_map::IntoValues<PathBuf, LibraryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_values()
    }
}
