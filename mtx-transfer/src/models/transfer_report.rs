//! Run results
//!
//! Per-item failures never abort a run. They are collected here and reported
//! once the remaining items are done.

use crate::models::TransferAction;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// Outcome of a single transfer item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemOutcome {
    Copied,
    Converted,
    Failed { reason: String },
}

/// Transfer item that did not complete
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferFailure {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub action: TransferAction,
    pub reason: String,
}

/// Destination file that could not be deleted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovalFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of applying (or declining) the removal list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RemovalReport {
    /// Number of removal candidates presented
    pub candidates: usize,
    /// Whether the removal was confirmed
    pub confirmed: bool,
    pub removed: Vec<PathBuf>,
    pub failed: Vec<RemovalFailure>,
}

/// Summary of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct TransferReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub destination: PathBuf,
    pub copied: Vec<PathBuf>,
    pub converted: Vec<PathBuf>,
    pub failed: Vec<TransferFailure>,
    pub removal: RemovalReport,
}

impl TransferReport {
    pub fn new(destination: PathBuf) -> Self {
        let now = Utc::now();
        Self {
            started_at: now,
            finished_at: now,
            destination,
            copied: Vec::new(),
            converted: Vec::new(),
            failed: Vec::new(),
            removal: RemovalReport::default(),
        }
    }

    /// Number of files written to the destination
    pub fn transferred(&self) -> usize {
        self.copied.len() + self.converted.len()
    }

    /// True if any transfer or removal item failed
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty() || !self.removal.failed.is_empty()
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
