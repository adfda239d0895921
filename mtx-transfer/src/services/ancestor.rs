//! Longest common ancestor of a set of paths
//!
//! Destination paths are built relative to this directory, so a manifest of
//! `/lib/A/song.flac` and `/lib/B` lands as `<dest>/A/...` and `<dest>/B/...`.
//!
//! The prefix test compares whole path components: `/Music/Foo` is not an
//! ancestor of `/Music/FooBar/x.mp3`.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AncestorError {
    #[error("Cannot compute a common ancestor of an empty path set")]
    EmptyInput,
}

/// Deepest directory that is an ancestor of every path
///
/// Seeds with the parent of the first path and walks up until every path
/// lies beneath the candidate, stopping at the filesystem root. A single
/// path yields its parent directory.
pub fn longest_common_ancestor<'a, I>(paths: I) -> Result<PathBuf, AncestorError>
where
    I: IntoIterator<Item = &'a Path>,
{
    let mut paths = paths.into_iter();
    let first = paths.next().ok_or(AncestorError::EmptyInput)?;
    let mut candidate: &Path = first.parent().unwrap_or(first);

    for path in std::iter::once(first).chain(paths) {
        while !path.starts_with(candidate) {
            match candidate.parent() {
                Some(parent) => candidate = parent,
                None => break,
            }
        }
    }

    Ok(candidate.to_path_buf())
}
