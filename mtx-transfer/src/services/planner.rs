//! Transfer planning
//!
//! Destination path for a source file:
//! 1. take its path relative to the common ancestor of all source files
//! 2. strip the extension and normalise the result
//! 3. re-root it under the destination directory
//! 4. append the target extension
//!
//! Files already in the target format are copied; everything else is
//! converted. Two sources that map onto one destination (`song.flac` next to
//! `song.mp3`, or names that normalise alike) would race on the same file, so
//! only the first in path order is planned and the rest are rejected.

use crate::models::{
    FileSet, LibraryEntry, TransferAction, TransferFailure, TransferItem, TransferPlan,
};
use mtx_common::normalize_path;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Planning errors
#[derive(Debug, Error)]
pub enum PlanError {
    /// A source file does not live under the common ancestor
    #[error("{} is not under the common ancestor {}", .path.display(), .ancestor.display())]
    OutsideAncestor { path: PathBuf, ancestor: PathBuf },
}

/// Builds transfer plans for one destination
pub struct TransferPlanner<'a> {
    ancestor: &'a Path,
    destination_root: &'a Path,
    target_extension: &'a str,
}

impl<'a> TransferPlanner<'a> {
    pub fn new(ancestor: &'a Path, destination_root: &'a Path, target_extension: &'a str) -> Self {
        Self {
            ancestor,
            destination_root,
            target_extension,
        }
    }

    /// Plan every entry of `to_transfer`
    pub fn plan(&self, to_transfer: &FileSet) -> Result<TransferPlan, PlanError> {
        let mut plan = TransferPlan::default();
        let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();

        for entry in to_transfer.iter() {
            let item = self.plan_entry(entry)?;
            match claimed.entry(item.destination.clone()) {
                Entry::Occupied(first) => {
                    warn!(
                        source = %item.source.display(),
                        destination = %item.destination.display(),
                        planned_from = %first.get().display(),
                        "Destination already planned from another source"
                    );
                    plan.rejected.push(TransferFailure {
                        reason: format!("destination collides with {}", first.get().display()),
                        source: item.source,
                        destination: item.destination,
                        action: item.action,
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(item.source.clone());
                    plan.items.push(item);
                }
            }
        }

        Ok(plan)
    }

    /// Plan a single entry
    pub fn plan_entry(&self, entry: &LibraryEntry) -> Result<TransferItem, PlanError> {
        let action = if entry.has_extension(self.target_extension) {
            TransferAction::Copy
        } else {
            TransferAction::Convert
        };

        Ok(TransferItem {
            source: entry.path.clone(),
            destination: self.destination_path(&entry.path)?,
            action,
        })
    }

    /// Derive the destination path of `source`
    pub fn destination_path(&self, source: &Path) -> Result<PathBuf, PlanError> {
        let relative = source
            .strip_prefix(self.ancestor)
            .map_err(|_| PlanError::OutsideAncestor {
                path: source.to_path_buf(),
                ancestor: self.ancestor.to_path_buf(),
            })?;
        let without_extension = relative.with_extension("");
        let normalized = normalize_path(&without_extension.to_string_lossy());

        // Appended rather than set with `with_extension` so dots in the stem survive
        let file_name = format!("{}.{}", normalized, self.target_extension);
        Ok(self.destination_root.join(file_name))
    }
}
