//! Error handling for hexrecon.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod assembly_error;
pub mod config_error;
pub mod error_code;
pub mod label_error;
pub mod recon_error;
pub mod store_error;

pub use assembly_error::AssemblyError;
pub use config_error::ConfigError;
pub use error_code::ReconErrorCode;
pub use label_error::LabelError;
pub use recon_error::ReconError;
pub use store_error::StoreError;
