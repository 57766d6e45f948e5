//! # hexrecon-core
//!
//! Foundation crate for the hexrecon tools.
//! Defines the label/address types, errors, config, tracing setup, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod traits;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::ReconConfig;
pub use errors::{AssemblyError, ConfigError, LabelError, ReconError, StoreError};
pub use traits::LabelSource;
pub use types::{Address, ImageCoordinate, ImageId, Label, LabelRecord, Locator};
