//! Cross-observer address aggregation.
//!
//! Each frame shows two rows of eight data words. The anchor image at the
//! start of each row carries the row's base address; data column `c` sits at
//! `base + word_stride * (c - 1)`. For every frame and every source whose
//! anchors check out, each confirmed data label is filed under its address
//! together with a locator naming the source and the image.

mod diagnostics;
mod image_index;

use std::collections::BTreeMap;
use std::iter;
use std::path::Path;

use hexrecon_core::config::AssemblyConfig;
use hexrecon_core::constants::{
    DATA_COLUMNS, DEFAULT_ANCHOR_GAP, DEFAULT_COVERAGE_STRIDE, DEFAULT_MIN_CONFIRMATIONS,
    DEFAULT_WORD_STRIDE, FRAME_ROWS,
};
use hexrecon_core::types::{FrameKey, LocatorList};
use hexrecon_core::{Address, AssemblyError, Label, LabelSource, Locator, StoreError};
use hexrecon_storage::LabelStore;
use rayon::prelude::*;
use tracing::{debug, info, trace};

pub use self::diagnostics::CoverageReport;
use self::image_index::{ImageIndex, ImageIndexBuilder};
use crate::assembled::{AddressEntry, AssembledLabelFile, LabelLocators};

/// Result of one aggregation run.
#[derive(Debug, Clone)]
pub struct Aggregation {
    pub file: AssembledLabelFile,
    pub report: CoverageReport,
}

/// Labels gathered from one source, keyed by address then label.
#[derive(Debug, Default)]
struct SourceLabels {
    labels: BTreeMap<Address, BTreeMap<Label, LocatorList>>,
    skipped_frames: usize,
}

#[derive(Debug, Clone)]
pub struct AddressAggregator {
    filters: Vec<String>,
    min_confirmations: u32,
    anchor_gap: u16,
    word_stride: u16,
    coverage_stride: u16,
}

impl AddressAggregator {
    /// Aggregator over images whose paths contain at least one of `filters`.
    pub fn new<I, S>(filters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            filters: filters.into_iter().map(Into::into).collect(),
            min_confirmations: DEFAULT_MIN_CONFIRMATIONS,
            anchor_gap: DEFAULT_ANCHOR_GAP,
            word_stride: DEFAULT_WORD_STRIDE,
            coverage_stride: DEFAULT_COVERAGE_STRIDE,
        }
    }

    pub fn from_config<I, S>(filters: I, config: &AssemblyConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            min_confirmations: config.effective_min_confirmations(),
            anchor_gap: config.effective_anchor_gap(),
            word_stride: config.effective_word_stride(),
            coverage_stride: config.effective_coverage_stride(),
            ..Self::new(filters)
        }
    }

    pub fn filters(&self) -> &[String] {
        &self.filters
    }

    /// Aggregate fully loaded sources. `ground_truth` becomes source 0 and
    /// also decides which frames are excluded as ambiguous.
    pub fn aggregate(
        &self,
        ground_truth: &dyn LabelSource,
        auxiliaries: &[&dyn LabelSource],
    ) -> Result<Aggregation, AssemblyError> {
        let sources: Vec<&dyn LabelSource> = iter::once(ground_truth)
            .chain(auxiliaries.iter().copied())
            .collect();

        let mut builder = ImageIndexBuilder::default();
        for source in &sources {
            builder.add_source(*source, self.min_confirmations, self.filters.as_slice())?;
        }
        let index = builder.build();
        let (frames, excluded) = self.frames_to_assemble(&index, ground_truth)?;
        info!(
            sources = sources.len(),
            images = index.len(),
            frames = frames.len(),
            excluded,
            "assembling labels"
        );

        let per_source = sources
            .par_iter()
            .enumerate()
            .map(|(i, source)| self.collect_source(i, *source, &frames, &index))
            .collect::<Result<Vec<_>, StoreError>>()?;

        let names = sources.iter().map(|s| s.source_name()).collect();
        Ok(self.finish(names, index, per_source, frames.len(), excluded))
    }

    /// Aggregate label tables on disk, holding at most one auxiliary table
    /// in memory at a time. Tables are opened read-only.
    pub fn aggregate_paths<P: AsRef<Path>>(
        &self,
        ground_truth: &Path,
        auxiliaries: &[P],
    ) -> Result<Aggregation, AssemblyError> {
        let truth = LabelStore::open_read_only(ground_truth)?;

        let mut builder = ImageIndexBuilder::default();
        builder.add_source(&truth, self.min_confirmations, self.filters.as_slice())?;
        for path in auxiliaries {
            let store = LabelStore::open_read_only(path)?;
            builder.add_source(&store, self.min_confirmations, self.filters.as_slice())?;
        }
        let index = builder.build();
        let (frames, excluded) = self.frames_to_assemble(&index, &truth)?;
        info!(
            sources = auxiliaries.len() + 1,
            images = index.len(),
            frames = frames.len(),
            excluded,
            "assembling labels"
        );

        let mut per_source = Vec::with_capacity(auxiliaries.len() + 1);
        per_source.push(self.collect_source(0, &truth, &frames, &index)?);
        for (i, path) in auxiliaries.iter().enumerate() {
            let store = LabelStore::open_read_only(path)?;
            per_source.push(self.collect_source(i + 1, &store, &frames, &index)?);
        }

        let names = iter::once(ground_truth.display().to_string())
            .chain(auxiliaries.iter().map(|p| p.as_ref().display().to_string()))
            .collect();
        Ok(self.finish(names, index, per_source, frames.len(), excluded))
    }

    /// Frames of the indexed images, minus those whose ground-truth anchors
    /// are confirmed ambiguous. Returns the frames and the excluded count.
    fn frames_to_assemble(
        &self,
        index: &ImageIndex,
        ground_truth: &dyn LabelSource,
    ) -> Result<(Vec<FrameKey>, usize), StoreError> {
        let mut frames = Vec::with_capacity(index.frames().len());
        let mut excluded = 0;
        for frame in index.frames() {
            let mut ambiguous = false;
            for row in 0..FRAME_ROWS {
                let anchor = ground_truth.confirmed_label(&frame.anchor_path(row), self.min_confirmations)?;
                ambiguous |= anchor.is_some_and(|label| label.is_ambiguous());
            }
            if ambiguous {
                debug!(%frame, "frame excluded by ambiguous ground-truth anchor");
                excluded += 1;
            } else {
                frames.push(frame.clone());
            }
        }
        Ok((frames, excluded))
    }

    /// Row base addresses of `frame` according to `source`, if both anchors
    /// are confirmed hex words exactly `anchor_gap` apart.
    fn row_bases(&self, source: &dyn LabelSource, frame: &FrameKey) -> Result<Option<[Address; 2]>, StoreError> {
        let anchor = |row: u8| -> Result<Option<u16>, StoreError> {
            Ok(source
                .confirmed_label(&frame.anchor_path(row), self.min_confirmations)?
                .and_then(|label| label.word()))
        };
        match (anchor(0)?, anchor(1)?) {
            (Some(a0), Some(a1)) if a1.checked_sub(a0) == Some(self.anchor_gap) => {
                Ok(Some([Address(a0), Address(a1)]))
            }
            _ => Ok(None),
        }
    }

    fn collect_source(
        &self,
        source_index: usize,
        source: &dyn LabelSource,
        frames: &[FrameKey],
        index: &ImageIndex,
    ) -> Result<SourceLabels, StoreError> {
        let mut out = SourceLabels::default();
        for frame in frames {
            let Some(bases) = self.row_bases(source, frame)? else {
                out.skipped_frames += 1;
                continue;
            };
            for (row, base) in (0..FRAME_ROWS).zip(bases) {
                for col in 1..=DATA_COLUMNS {
                    let Some(address) = self
                        .word_stride
                        .checked_mul(u16::from(col - 1))
                        .and_then(|delta| base.offset(delta))
                    else {
                        trace!(%frame, row, col, "address past 0xFFFF dropped");
                        continue;
                    };
                    let path = frame.path_of(row, col);
                    let Some(label) = source.confirmed_label(&path, self.min_confirmations)? else {
                        continue;
                    };
                    let Some(image) = index.position(&path) else {
                        trace!(%path, "confirmed image outside the filtered index");
                        continue;
                    };
                    out.labels
                        .entry(address)
                        .or_default()
                        .entry(label)
                        .or_default()
                        .push(Locator::new(source_index, image));
                }
            }
        }
        debug!(
            source = source_index,
            addresses = out.labels.len(),
            skipped_frames = out.skipped_frames,
            "collected source labels"
        );
        Ok(out)
    }

    fn finish(
        &self,
        sources: Vec<String>,
        index: ImageIndex,
        per_source: Vec<SourceLabels>,
        frames: usize,
        excluded_frames: usize,
    ) -> Aggregation {
        let mut merged: BTreeMap<Address, BTreeMap<Label, LocatorList>> = BTreeMap::new();
        let mut skipped_frames = Vec::with_capacity(per_source.len());
        for part in per_source {
            skipped_frames.push(part.skipped_frames);
            for (address, labels) in part.labels {
                let slot = merged.entry(address).or_default();
                for (label, locators) in labels {
                    slot.entry(label).or_default().extend(locators);
                }
            }
        }

        let entries: Vec<AddressEntry> = merged
            .into_iter()
            .map(|(address, labels)| AddressEntry {
                address,
                labels: labels
                    .into_iter()
                    .map(|(label, mut locators)| {
                        locators.sort_unstable();
                        LabelLocators { label, locators }
                    })
                    .collect(),
            })
            .collect();

        let mut report = CoverageReport::analyze(&entries, self.coverage_stride);
        report.frames = frames;
        report.excluded_frames = excluded_frames;
        report.skipped_frames = skipped_frames;
        report.log();

        Aggregation {
            file: AssembledLabelFile {
                sources,
                images: index.into_images(),
                entries,
            },
            report,
        }
    }
}
