//! Source/destination reconciliation
//!
//! Matches source entries to destination entries by identity (normalised
//! stem) only; directory location and extension are ignored, so a song moved
//! within the source tree still matches its destination copy.
//!
//! Matching is mutually consuming: each destination entry satisfies at most
//! one source entry and vice versa. The result is built as fresh sets rather
//! than by removing from the inputs.
//!
//! # Precondition
//!
//! Stems are unique across the library. When two source files share an
//! identity only one of them can match a destination entry; which one is
//! decided by path order. Such collisions are logged.

use crate::models::{FileSet, LibraryEntry};
use std::collections::{BTreeMap, VecDeque};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Matched source/destination pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedPair {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Result of reconciling two file sets
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    /// Source entries with no destination counterpart
    pub to_transfer: FileSet,
    /// Destination entries with no source counterpart (removal candidates)
    pub only_in_destination: FileSet,
    /// Entries present on both sides
    pub already_present: Vec<MatchedPair>,
}

/// Partition `source` and `destination` into transfer, removal and matched sets
pub fn reconcile(source: &FileSet, destination: &FileSet) -> Reconciliation {
    warn_on_identity_collisions(source);

    // Destination entries grouped by identity, in path order
    let mut available: BTreeMap<&str, VecDeque<&LibraryEntry>> = BTreeMap::new();
    for entry in destination.iter() {
        available
            .entry(entry.identity.as_str())
            .or_default()
            .push_back(entry);
    }

    let mut result = Reconciliation::default();

    for entry in source.iter() {
        let matched = available
            .get_mut(entry.identity.as_str())
            .and_then(VecDeque::pop_front);

        match matched {
            Some(dest) => result.already_present.push(MatchedPair {
                source: entry.path.clone(),
                destination: dest.path.clone(),
            }),
            None => {
                result.to_transfer.insert(entry.clone());
            }
        }
    }

    result.only_in_destination = available
        .into_values()
        .flatten()
        .cloned()
        .collect();

    debug!(
        to_transfer = result.to_transfer.len(),
        only_in_destination = result.only_in_destination.len(),
        already_present = result.already_present.len(),
        "Reconciliation complete"
    );

    result
}

fn warn_on_identity_collisions(source: &FileSet) {
    let mut by_identity: BTreeMap<&str, Vec<&PathBuf>> = BTreeMap::new();
    for entry in source.iter() {
        by_identity
            .entry(entry.identity.as_str())
            .or_default()
            .push(&entry.path);
    }

    for (identity, paths) in by_identity.iter().filter(|(_, p)| p.len() > 1) {
        warn!(
            identity = %identity,
            paths = ?paths,
            "Source files share a name; only one can match a destination file"
        );
    }
}
