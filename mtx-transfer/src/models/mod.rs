//! Data models for the transfer engine
//!
//! All values are rebuilt from the filesystem on every run; nothing persists.

pub mod extension_set;
pub mod library_entry;
pub mod transfer_plan;
pub mod transfer_report;

pub use extension_set::ExtensionSet;
pub use library_entry::{FileSet, LibraryEntry};
pub use transfer_plan::{TransferAction, TransferItem, TransferPlan};
pub use transfer_report::{ItemOutcome, RemovalFailure, RemovalReport, TransferFailure, TransferReport};
