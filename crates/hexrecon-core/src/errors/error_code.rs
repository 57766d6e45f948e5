//! ReconErrorCode trait for stable, machine-readable error codes.

/// Every error enum implements this to provide a structured error code
/// string for scripts that wrap the CLI.
pub trait ReconErrorCode {
    /// Returns the error code string (e.g., "STORE_FORMAT").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted error string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const INVALID_LABEL: &str = "INVALID_LABEL";
pub const STORE_FORMAT: &str = "STORE_FORMAT";
pub const UNKNOWN_IDENTITY: &str = "UNKNOWN_IDENTITY";
pub const READ_ONLY: &str = "READ_ONLY";
pub const STORE_IO: &str = "STORE_IO";
pub const LOCK_POISONED: &str = "LOCK_POISONED";
pub const ALREADY_EXISTS: &str = "ALREADY_EXISTS";
pub const ASSEMBLY_FORMAT: &str = "ASSEMBLY_FORMAT";
pub const NON_HEX_LABEL: &str = "NON_HEX_LABEL";
pub const ASSEMBLY_IO: &str = "ASSEMBLY_IO";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const OUTPUT_IO: &str = "OUTPUT_IO";
