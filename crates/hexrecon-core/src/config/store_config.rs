//! Label store configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_AUTOSAVE_EVERY;

/// Configuration for label stores and labeling sessions.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StoreConfig {
    /// Rotate the previous table to `<path>~<epoch>~` before persisting. Default: true.
    pub save_backups: Option<bool>,
    /// Persist modified writable stores when they are dropped. Default: true.
    pub persist_on_drop: Option<bool>,
    /// Labeling actions between session autosaves. Default: 100.
    pub autosave_every: Option<u32>,
}

impl StoreConfig {
    pub fn effective_save_backups(&self) -> bool {
        self.save_backups.unwrap_or(true)
    }

    pub fn effective_persist_on_drop(&self) -> bool {
        self.persist_on_drop.unwrap_or(true)
    }

    pub fn effective_autosave_every(&self) -> u32 {
        self.autosave_every.unwrap_or(DEFAULT_AUTOSAVE_EVERY)
    }
}
