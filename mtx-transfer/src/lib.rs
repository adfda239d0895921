//! mtx-transfer library interface
//!
//! Reconciles a source music library against a portable destination and
//! converts what is missing. Exposed as a library for integration testing.

pub mod error;
pub mod manifest;
pub mod models;
pub mod services;
pub mod workflow;

pub use crate::error::{TransferError, TransferResult};
pub use crate::workflow::{
    Preparation, PreparedTransfer, TransferOutcome, TransferRequest, TransferWorkflow,
};
