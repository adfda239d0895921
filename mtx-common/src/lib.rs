//! # mtx-common
//!
//! Shared code for the music transfer tools:
//! - Error type and result alias
//! - Configuration loading (TOML bootstrap file + built-in defaults)
//! - Logging initialisation
//! - Filesystem-safe path normalisation

pub mod config;
pub mod error;
pub mod logging;
pub mod normalize;

pub use error::{Error, Result};
pub use normalize::normalize_path;
