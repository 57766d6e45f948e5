//! Aggregation, assembled-file, and resolution errors.

use super::error_code::{self, ReconErrorCode};
use super::StoreError;

/// Errors that can occur while assembling or resolving labels.
#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("assembled file line {line}: {message}")]
    MalformedLine { line: usize, message: String },

    #[error("assembled file is missing the {section:?} section")]
    MissingSection { section: &'static str },

    #[error("address {address:04X}: winning label {label:?} is not a hex word")]
    NonHexLabel { address: u16, label: String },

    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },
}

impl AssemblyError {
    /// Wrap an `std::io::Error` with the path it happened on.
    pub fn io(path: impl AsRef<std::path::Path>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            message: err.to_string(),
        }
    }
}

impl ReconErrorCode for AssemblyError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Store(e) => e.error_code(),
            Self::MalformedLine { .. } | Self::MissingSection { .. } => {
                error_code::ASSEMBLY_FORMAT
            }
            Self::NonHexLabel { .. } => error_code::NON_HEX_LABEL,
            Self::Io { .. } => error_code::ASSEMBLY_IO,
        }
    }
}
