//! Label parsing errors.

use super::error_code::{self, ReconErrorCode};

/// Errors raised when text cannot be turned into a [`crate::Label`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LabelError {
    #[error("label {label:?} has {len} characters, expected 4")]
    WrongLength { label: String, len: usize },

    #[error("label {label:?} contains non-alphanumeric character {ch:?}")]
    InvalidCharacter { label: String, ch: char },
}

impl ReconErrorCode for LabelError {
    fn error_code(&self) -> &'static str {
        error_code::INVALID_LABEL
    }
}
