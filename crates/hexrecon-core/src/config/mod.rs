//! Configuration system for hexrecon.
//! TOML-based, layered resolution: CLI > env > config file > defaults.

pub mod assembly_config;
pub mod observability_config;
pub mod recon_config;
pub mod store_config;

pub use assembly_config::AssemblyConfig;
pub use observability_config::ObservabilityConfig;
pub use recon_config::{CliOverrides, ReconConfig};
pub use store_config::StoreConfig;
