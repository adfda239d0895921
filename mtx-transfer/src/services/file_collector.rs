//! Audio file collector
//!
//! Walks a list of roots (explicit files and directory trees) and gathers the
//! files whose extension is in an allowlist, deduplicated by absolute path.
//!
//! Source roots are strict: a root that is neither a file nor a directory
//! fails the whole collection. The destination root is lenient: a missing
//! destination is simply empty, since a first transfer targets a directory
//! that does not exist yet.

use crate::models::{ExtensionSet, FileSet, LibraryEntry};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

/// File collector errors
#[derive(Debug, Error)]
pub enum CollectError {
    /// Source root is neither an existing file nor an existing directory
    #[error("Could not find source path: {}", .0.display())]
    SourcePathNotFound(PathBuf),

    /// Cannot resolve a relative root against the working directory
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// How a root that does not exist is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingRoot {
    /// Fail with [`CollectError::SourcePathNotFound`]
    Fail,
    /// Contribute nothing
    Empty,
}

/// Collection statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionStats {
    /// Files added to the set
    pub accepted: usize,
    /// Files skipped for an extension outside the allowlist
    pub unknown_extension: usize,
    /// Files skipped because their path was already collected
    pub duplicates: usize,
    /// Directory entries that could not be read
    pub walk_errors: usize,
}

/// Collected file set with statistics
#[derive(Debug, Clone, Default)]
pub struct Collection {
    pub files: FileSet,
    pub stats: CollectionStats,
}

/// Audio file collector
pub struct FileCollector {
    allowed: ExtensionSet,
    missing_root: MissingRoot,
}

impl FileCollector {
    pub fn new(allowed: ExtensionSet, missing_root: MissingRoot) -> Self {
        Self {
            allowed,
            missing_root,
        }
    }

    /// Collector for manifest roots
    pub fn for_sources(allowed: ExtensionSet) -> Self {
        Self::new(allowed, MissingRoot::Fail)
    }

    /// Collector for the destination directory
    pub fn for_destination(allowed: ExtensionSet) -> Self {
        Self::new(allowed, MissingRoot::Empty)
    }

    /// Collect allowlisted files under every root
    pub fn collect<P: AsRef<Path>>(&self, roots: &[P]) -> Result<Collection, CollectError> {
        let mut collection = Collection::default();

        for root in roots {
            let root = absolute(root.as_ref())?;

            if root.is_file() {
                self.consider(&root, &mut collection);
            } else if root.is_dir() {
                self.walk(&root, &mut collection);
            } else {
                match self.missing_root {
                    MissingRoot::Fail => return Err(CollectError::SourcePathNotFound(root)),
                    MissingRoot::Empty => {
                        debug!("Root {} does not exist, treating as empty", root.display());
                    }
                }
            }
        }

        debug!(
            accepted = collection.stats.accepted,
            unknown_extension = collection.stats.unknown_extension,
            duplicates = collection.stats.duplicates,
            walk_errors = collection.stats.walk_errors,
            "Collection complete"
        );

        Ok(collection)
    }

    /// Recursively enumerate files under a directory root
    fn walk(&self, root: &Path, collection: &mut Collection) {
        // follow_links makes walkdir detect symlink loops and report them as errors
        let walker = WalkDir::new(root).follow_links(true);

        for entry in walker {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() {
                        self.consider(entry.path(), collection);
                    }
                }
                Err(e) => {
                    collection.stats.walk_errors += 1;
                    warn!("Error accessing entry: {}", e);
                }
            }
        }
    }

    /// Apply the extension filter and path deduplication to one file
    fn consider(&self, path: &Path, collection: &mut Collection) {
        let entry = if self.allowed.matches(path) {
            LibraryEntry::from_path(path)
        } else {
            None
        };

        let Some(entry) = entry else {
            collection.stats.unknown_extension += 1;
            trace!("Unknown file extension of entry: {}", path.display());
            return;
        };

        if collection.files.insert(entry) {
            collection.stats.accepted += 1;
        } else {
            collection.stats.duplicates += 1;
            warn!("Ignoring duplicate input entry: {}", path.display());
        }
    }
}

/// Make a path absolute against the current directory without touching the filesystem
fn absolute(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
