//! Label store errors.

use super::error_code::{self, ReconErrorCode};
use super::LabelError;

/// Errors that can occur while loading, mutating, or persisting a label store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("label table {path} line {line}: {message}")]
    Format {
        path: String,
        line: u64,
        message: String,
    },

    #[error("{id} is not an image known to the label store {path}")]
    UnknownIdentity { id: String, path: String },

    #[error("the label store {path} was opened read-only and will not be mutated or overwritten")]
    ReadOnly { path: String },

    #[error(transparent)]
    InvalidLabel(#[from] LabelError),

    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    #[error("{which} lock poisoned")]
    LockPoisoned { which: &'static str },

    #[error("label table {path} already exists")]
    AlreadyExists { path: String },
}

impl StoreError {
    /// Wrap an `std::io::Error` with the path it happened on.
    pub fn io(path: impl AsRef<std::path::Path>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            message: err.to_string(),
        }
    }
}

impl ReconErrorCode for StoreError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Format { .. } => error_code::STORE_FORMAT,
            Self::UnknownIdentity { .. } => error_code::UNKNOWN_IDENTITY,
            Self::ReadOnly { .. } => error_code::READ_ONLY,
            Self::InvalidLabel(e) => e.error_code(),
            Self::Io { .. } => error_code::STORE_IO,
            Self::LockPoisoned { .. } => error_code::LOCK_POISONED,
            Self::AlreadyExists { .. } => error_code::ALREADY_EXISTS,
        }
    }
}
