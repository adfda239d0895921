//! Error types for mtx-transfer
//!
//! Only fatal conditions live here. Skipped files and failed transfer items
//! are reported through diagnostics and the [`TransferReport`](crate::models::TransferReport).

use crate::services::{CollectError, PlanError};
use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const USAGE: i32 = 1;
    pub const MANIFEST_UNREADABLE: i32 = 2;
    pub const SOURCE_NOT_FOUND: i32 = 3;
    pub const CONFIG: i32 = 4;
    pub const ITEM_FAILURES: i32 = 5;
    pub const IO: i32 = 6;
}

/// Fatal transfer run error
#[derive(Debug, Error)]
pub enum TransferError {
    /// Manifest file missing or unreadable
    #[error("PATHS-FILE '{}' does not exist or is not readable: {source}", .path.display())]
    ManifestUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A manifest entry is neither a file nor a directory
    #[error("Could not find source path: {}", .0.display())]
    SourcePathNotFound(PathBuf),

    /// Configuration could not be loaded or is invalid
    #[error(transparent)]
    Config(#[from] mtx_common::Error),

    /// Transfer plan could not be built
    #[error("Planning failed: {0}")]
    Plan(#[from] PlanError),

    /// I/O failure outside per-item transfer work
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransferError {
    pub fn exit_code(&self) -> i32 {
        match self {
            TransferError::ManifestUnreadable { .. } => exit_code::MANIFEST_UNREADABLE,
            TransferError::SourcePathNotFound(_) => exit_code::SOURCE_NOT_FOUND,
            TransferError::Config(_) => exit_code::CONFIG,
            TransferError::Plan(_) | TransferError::Io(_) => exit_code::IO,
        }
    }
}

impl From<CollectError> for TransferError {
    fn from(err: CollectError) -> Self {
        match err {
            CollectError::SourcePathNotFound(path) => TransferError::SourcePathNotFound(path),
            CollectError::Io(e) => TransferError::Io(e),
        }
    }
}

/// Result type for transfer runs
pub type TransferResult<T> = Result<T, TransferError>;
