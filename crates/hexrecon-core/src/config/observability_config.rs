//! Logging configuration.

use serde::{Deserialize, Serialize};

/// Configuration for log output.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// `EnvFilter` directive used when `HEXRECON_LOG` is unset. Default: "hexrecon=info".
    pub log_level: Option<String>,
}

impl ObservabilityConfig {
    pub fn effective_log_level(&self) -> &str {
        self.log_level
            .as_deref()
            .unwrap_or(crate::constants::DEFAULT_LOG_FILTER)
    }
}
