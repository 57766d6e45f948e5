//! Top-level hexrecon configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{AssemblyConfig, ObservabilityConfig, StoreConfig};
use crate::errors::ConfigError;

/// File name looked up in the working directory when no explicit config is given.
pub const PROJECT_CONFIG_FILE: &str = "hexrecon.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`HEXRECON_*`)
/// 3. Config file (`--config`, else `hexrecon.toml` in the working directory)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReconConfig {
    pub store: StoreConfig,
    pub assembly: AssemblyConfig,
    pub observability: ObservabilityConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub min_confirmations: Option<u32>,
    pub log_level: Option<String>,
}

impl ReconConfig {
    /// Load configuration with layered resolution.
    ///
    /// An explicit `config_file` must exist; the implicit `hexrecon.toml`
    /// in `root` is optional.
    pub fn load(
        root: &Path,
        config_file: Option<&Path>,
        cli_overrides: Option<&CliOverrides>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        match config_file {
            Some(path) => Self::merge_toml_file(&mut config, path)?,
            None => {
                let project_config_path = root.join(PROJECT_CONFIG_FILE);
                if project_config_path.exists() {
                    Self::merge_toml_file(&mut config, &project_config_path)?;
                }
            }
        }

        Self::apply_env_overrides(&mut config);

        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &ReconConfig) -> Result<(), ConfigError> {
        let positive = |field: &str, ok: bool| {
            if ok {
                Ok(())
            } else {
                Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "must be greater than 0".to_string(),
                })
            }
        };
        positive(
            "assembly.min_confirmations",
            config.assembly.effective_min_confirmations() > 0,
        )?;
        positive("assembly.anchor_gap", config.assembly.effective_anchor_gap() > 0)?;
        positive("assembly.word_stride", config.assembly.effective_word_stride() > 0)?;
        positive(
            "assembly.coverage_stride",
            config.assembly.effective_coverage_stride() > 0,
        )?;
        positive("store.autosave_every", config.store.effective_autosave_every() > 0)?;
        Ok(())
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut ReconConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: ReconConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        tracing::debug!(path = %path.display(), "merged config file");
        Ok(())
    }

    /// Merge `other` into `base`, where `other` values override `base` values
    /// only when `other` has a `Some` value.
    fn merge(base: &mut ReconConfig, other: &ReconConfig) {
        // Store
        if other.store.save_backups.is_some() {
            base.store.save_backups = other.store.save_backups;
        }
        if other.store.persist_on_drop.is_some() {
            base.store.persist_on_drop = other.store.persist_on_drop;
        }
        if other.store.autosave_every.is_some() {
            base.store.autosave_every = other.store.autosave_every;
        }

        // Assembly
        if other.assembly.min_confirmations.is_some() {
            base.assembly.min_confirmations = other.assembly.min_confirmations;
        }
        if other.assembly.anchor_gap.is_some() {
            base.assembly.anchor_gap = other.assembly.anchor_gap;
        }
        if other.assembly.word_stride.is_some() {
            base.assembly.word_stride = other.assembly.word_stride;
        }
        if other.assembly.coverage_stride.is_some() {
            base.assembly.coverage_stride = other.assembly.coverage_stride;
        }

        // Observability
        if other.observability.log_level.is_some() {
            base.observability.log_level = other.observability.log_level.clone();
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `HEXRECON_STORE_SAVE_BACKUPS`, `HEXRECON_ASSEMBLY_MIN_CONFIRMATIONS`, etc.
    fn apply_env_overrides(config: &mut ReconConfig) {
        if let Ok(val) = std::env::var("HEXRECON_STORE_SAVE_BACKUPS") {
            if let Ok(v) = val.parse::<bool>() {
                config.store.save_backups = Some(v);
            }
        }
        if let Ok(val) = std::env::var("HEXRECON_STORE_AUTOSAVE_EVERY") {
            if let Ok(v) = val.parse::<u32>() {
                config.store.autosave_every = Some(v);
            }
        }
        if let Ok(val) = std::env::var("HEXRECON_ASSEMBLY_MIN_CONFIRMATIONS") {
            if let Ok(v) = val.parse::<u32>() {
                config.assembly.min_confirmations = Some(v);
            }
        }
        if let Ok(val) = std::env::var("HEXRECON_OBSERVABILITY_LOG_LEVEL") {
            config.observability.log_level = Some(val);
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut ReconConfig, cli: &CliOverrides) {
        if let Some(v) = cli.min_confirmations {
            config.assembly.min_confirmations = Some(v);
        }
        if let Some(ref v) = cli.log_level {
            config.observability.log_level = Some(v.clone());
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}
