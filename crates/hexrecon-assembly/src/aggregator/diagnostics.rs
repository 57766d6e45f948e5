//! Coverage and agreement diagnostics for one aggregation run.

use std::collections::BTreeMap;

use hexrecon_core::Address;
use tracing::{info, warn};

use crate::assembled::AddressEntry;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageReport {
    pub first: Option<Address>,
    pub last: Option<Address>,
    /// Addresses presumed missing, assuming one entry every coverage stride.
    pub missing: Vec<Address>,
    /// Number of distinct labels per address -> number of addresses.
    /// Key 1 counts unanimous addresses.
    pub label_histogram: BTreeMap<usize, usize>,
    /// Frames whose stems survived the ground-truth exclusion.
    pub frames: usize,
    /// Frames dropped because a ground-truth anchor is ambiguous.
    pub excluded_frames: usize,
    /// Per source, frames skipped for unconfirmed, non-hex, or misaligned anchors.
    pub skipped_frames: Vec<usize>,
}

impl CoverageReport {
    pub(crate) fn analyze(entries: &[AddressEntry], coverage_stride: u16) -> Self {
        let mut report = Self {
            first: entries.first().map(|e| e.address),
            last: entries.last().map(|e| e.address),
            ..Self::default()
        };

        let stride = u32::from(coverage_stride.max(1));
        for pair in entries.windows(2) {
            let prev = u32::from(pair[0].address.value());
            let next = u32::from(pair[1].address.value());
            if next - prev > stride {
                let mut gone = prev + stride;
                while gone < next {
                    // `gone < next <= u16::MAX`
                    report.missing.push(Address(gone as u16));
                    gone += stride;
                }
            }
        }

        for entry in entries {
            *report.label_histogram.entry(entry.labels.len()).or_default() += 1;
        }
        report
    }

    pub fn unanimous(&self) -> usize {
        self.label_histogram.get(&1).copied().unwrap_or(0)
    }

    pub fn log(&self) {
        match (self.first, self.last) {
            (Some(first), Some(last)) => {
                info!(%first, "first address");
                for address in &self.missing {
                    warn!(%address, "no data for address");
                }
                info!(%last, "last address");
            }
            _ => warn!("no addresses recovered"),
        }
        info!(
            frames = self.frames,
            excluded = self.excluded_frames,
            skipped = ?self.skipped_frames,
            "frame coverage"
        );
        info!(addresses = self.unanimous(), "addresses with unanimous labeling");
        for (&labels, &addresses) in self.label_histogram.range(2..) {
            info!(addresses, labels, "addresses with conflicting labels");
        }
    }
}
