//! Reverse index from confirmation count to the entries holding that count.
//!
//! Buckets are dense vectors of entry positions so that moving an entry
//! between buckets and drawing a uniform sample from a bucket are both O(1).
//! The caller remembers each entry's slot inside its bucket; `remove` reports
//! which entry was swapped into the vacated slot so the caller can fix it up.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub(crate) struct CountIndex {
    buckets: BTreeMap<u32, Vec<usize>>,
}

impl CountIndex {
    /// Add `entry` to the `count` bucket, returning its slot.
    pub(crate) fn insert(&mut self, count: u32, entry: usize) -> usize {
        let bucket = self.buckets.entry(count).or_default();
        bucket.push(entry);
        bucket.len() - 1
    }

    /// Remove whatever sits at `slot` of the `count` bucket.
    /// Returns the entry that now occupies `slot`, if any.
    pub(crate) fn remove(&mut self, count: u32, slot: usize) -> Option<usize> {
        let bucket = self.buckets.get_mut(&count)?;
        if slot >= bucket.len() {
            return None;
        }
        bucket.swap_remove(slot);
        let moved = bucket.get(slot).copied();
        if bucket.is_empty() {
            self.buckets.remove(&count);
        }
        moved
    }

    pub(crate) fn bucket(&self, count: u32) -> &[usize] {
        self.buckets.get(&count).map_or(&[], Vec::as_slice)
    }

    pub(crate) fn count_exactly(&self, count: u32) -> usize {
        self.bucket(count).len()
    }

    pub(crate) fn count_at_least(&self, count: u32) -> usize {
        self.buckets.range(count..).map(|(_, bucket)| bucket.len()).sum()
    }

    /// `(count, bucket size)` for every non-empty bucket, ascending by count.
    pub(crate) fn histogram(&self) -> Vec<(u32, usize)> {
        self.buckets
            .iter()
            .map(|(&count, bucket)| (count, bucket.len()))
            .collect()
    }

    pub(crate) fn total(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}
