//! Top-level error aggregating every subsystem.

use super::error_code::{self, ReconErrorCode};
use super::{AssemblyError, ConfigError, LabelError, StoreError};

/// Errors surfaced by the command-line front end.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum ReconError {
    #[error("Label error: {0}")]
    Label(#[from] LabelError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Assembly error: {0}")]
    Assembly(#[from] AssemblyError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },
}

impl ReconError {
    /// Wrap an `std::io::Error` with the path (or stream name) it happened on.
    pub fn io(path: impl AsRef<std::path::Path>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            message: err.to_string(),
        }
    }
}

impl ReconErrorCode for ReconError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Label(e) => e.error_code(),
            Self::Store(e) => e.error_code(),
            Self::Assembly(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::Io { .. } => error_code::OUTPUT_IO,
        }
    }
}
