//! Global image numbering shared by every locator in one assembly.

use std::collections::{BTreeMap, BTreeSet};

use hexrecon_core::types::{FrameKey, FxHashMap};
use hexrecon_core::{ImageCoordinate, ImageId, LabelSource, StoreError};

/// Confirmed data images from every source, sorted by path and numbered
/// from zero.
#[derive(Debug, Default)]
pub(crate) struct ImageIndex {
    images: Vec<ImageId>,
    positions: FxHashMap<ImageId, usize>,
    frames: BTreeSet<FrameKey>,
}

/// Accumulates image paths before numbering.
#[derive(Debug, Default)]
pub(crate) struct ImageIndexBuilder {
    images: BTreeMap<ImageId, FrameKey>,
}

impl ImageIndexBuilder {
    /// Add every confirmed data image of `source` whose path contains one of
    /// `filters`.
    pub(crate) fn add_source<S: AsRef<str>>(
        &mut self,
        source: &dyn LabelSource,
        min_confirmations: u32,
        filters: &[S],
    ) -> Result<(), StoreError> {
        for (id, _) in source.labels_with_count_at_least(min_confirmations)? {
            if self.images.contains_key(&id) || !id.matches_any(filters) {
                continue;
            }
            match ImageCoordinate::parse(id.as_str()) {
                Some(coord) if coord.is_data() => {
                    self.images.insert(id, coord.frame);
                }
                _ => {}
            }
        }
        Ok(())
    }

    pub(crate) fn build(self) -> ImageIndex {
        let mut index = ImageIndex::default();
        for (i, (id, frame)) in self.images.into_iter().enumerate() {
            index.positions.insert(id.clone(), i);
            index.images.push(id);
            index.frames.insert(frame);
        }
        index
    }
}

impl ImageIndex {
    pub(crate) fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub(crate) fn frames(&self) -> &BTreeSet<FrameKey> {
        &self.frames
    }

    pub(crate) fn len(&self) -> usize {
        self.images.len()
    }

    pub(crate) fn into_images(self) -> Vec<ImageId> {
        self.images
    }
}
