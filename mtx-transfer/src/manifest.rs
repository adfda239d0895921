//! Manifest file reader
//!
//! Plain text, one source file or directory per line. Lines are trimmed and
//! blank lines ignored; there is no quoting or escaping.

use crate::error::{TransferError, TransferResult};
use std::path::{Path, PathBuf};

/// Read the manifest at `path`
pub fn read_manifest(path: &Path) -> TransferResult<Vec<PathBuf>> {
    let content =
        std::fs::read_to_string(path).map_err(|source| TransferError::ManifestUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(parse_manifest(&content))
}

/// Parse manifest text into source roots
pub fn parse_manifest(content: &str) -> Vec<PathBuf> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect()
}
