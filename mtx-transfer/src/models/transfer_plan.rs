//! Transfer plan: what gets written where

use crate::models::TransferFailure;
use serde::Serialize;
use std::path::PathBuf;

/// How a source file reaches the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferAction {
    /// Byte-preserving copy (source already in target format)
    Copy,
    /// Format conversion through the external codec
    Convert,
}

/// One file to transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferItem {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub action: TransferAction,
}

impl TransferItem {
    pub fn requires_conversion(&self) -> bool {
        self.action == TransferAction::Convert
    }
}

/// Ordered list of transfer items
///
/// Every item writes a distinct destination path. Items that would have
/// written a path already claimed by an earlier item are kept in `rejected`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransferPlan {
    pub items: Vec<TransferItem>,
    pub rejected: Vec<TransferFailure>,
}

impl TransferPlan {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn conversions(&self) -> usize {
        self.items.iter().filter(|i| i.requires_conversion()).count()
    }
}
