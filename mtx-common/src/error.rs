//! Common error types for music transfer

use thiserror::Error;

/// Common result type for music transfer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the transfer crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
