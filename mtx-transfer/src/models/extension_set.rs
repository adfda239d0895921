//! Audio format allowlists

use mtx_common::config::{canonical_extension, TransferConfig};
use std::collections::BTreeSet;
use std::path::Path;

/// Set of accepted file extensions
///
/// Extensions are held without the leading dot and matched
/// ASCII-case-insensitively, so `Song.FLAC` is accepted by `{"flac"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionSet {
    extensions: BTreeSet<String>,
}

impl ExtensionSet {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|ext| canonical_extension(ext.as_ref()))
                .collect(),
        }
    }

    /// Source-side allowlist from configuration
    pub fn source(config: &TransferConfig) -> Self {
        Self::new(&config.source_extensions)
    }

    /// Destination-side allowlist: only the target format
    pub fn destination(config: &TransferConfig) -> Self {
        Self::new([&config.target_extension])
    }

    pub fn contains(&self, ext: &str) -> bool {
        self.extensions.contains(&canonical_extension(ext))
    }

    /// True if the path has an extension in this set
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| self.contains(&ext.to_string_lossy()))
            .unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }
}
