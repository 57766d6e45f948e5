//! Aggregation and resolution configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ANCHOR_GAP, DEFAULT_COVERAGE_STRIDE, DEFAULT_MIN_CONFIRMATIONS,
    DEFAULT_WORD_STRIDE,
};

/// Configuration for the address aggregator and consensus resolver.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AssemblyConfig {
    /// Count at which a label counts as confirmed. Default: 2.
    pub min_confirmations: Option<u32>,
    /// Required row-1 minus row-0 anchor address. Default: 0x10.
    pub anchor_gap: Option<u16>,
    /// Address step between neighbouring data columns. Default: 2.
    pub word_stride: Option<u16>,
    /// Stride assumed when reporting coverage gaps. Default: 0x10.
    pub coverage_stride: Option<u16>,
}

impl AssemblyConfig {
    pub fn effective_min_confirmations(&self) -> u32 {
        self.min_confirmations.unwrap_or(DEFAULT_MIN_CONFIRMATIONS)
    }

    pub fn effective_anchor_gap(&self) -> u16 {
        self.anchor_gap.unwrap_or(DEFAULT_ANCHOR_GAP)
    }

    pub fn effective_word_stride(&self) -> u16 {
        self.word_stride.unwrap_or(DEFAULT_WORD_STRIDE)
    }

    pub fn effective_coverage_stride(&self) -> u16 {
        self.coverage_stride.unwrap_or(DEFAULT_COVERAGE_STRIDE)
    }
}
