//! In-memory label table: insertion-ordered records plus the count index,
//! kept in lockstep by every mutation.

use hexrecon_core::types::FxHashMap;
use hexrecon_core::{ImageId, Label, LabelRecord};
use rand::Rng;

use super::count_index::CountIndex;

#[derive(Debug, Clone)]
struct Entry {
    id: ImageId,
    record: LabelRecord,
    /// Position of this entry inside its count bucket.
    slot: usize,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct LabelTable {
    entries: Vec<Entry>,
    positions: FxHashMap<ImageId, usize>,
    index: CountIndex,
    /// Bumped on every mutation; compared against the last persisted value.
    generation: u64,
}

impl LabelTable {
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn set_generation(&mut self, generation: u64) {
        self.generation = generation;
    }

    pub(crate) fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    pub(crate) fn get(&self, id: &str) -> Option<LabelRecord> {
        self.positions.get(id).map(|&i| self.entries[i].record)
    }

    /// Overwrite (or register) `id`. New identities go to the end.
    pub(crate) fn force_set(&mut self, id: ImageId, record: LabelRecord) {
        match self.positions.get(id.as_str()) {
            Some(&i) => self.replace(i, record),
            None => {
                let i = self.entries.len();
                let slot = self.index.insert(record.count, i);
                self.positions.insert(id.clone(), i);
                self.entries.push(Entry { id, record, slot });
                self.generation += 1;
            }
        }
    }

    /// Apply one vote. Returns the record before and after, or `None` if
    /// `id` is not tracked.
    pub(crate) fn vote(&mut self, id: &str, proposed: Label) -> Option<(LabelRecord, LabelRecord)> {
        let &i = self.positions.get(id)?;
        let before = self.entries[i].record;
        let after = before.voted(proposed);
        self.replace(i, after);
        Some((before, after))
    }

    fn replace(&mut self, i: usize, record: LabelRecord) {
        let old_count = self.entries[i].record.count;
        if old_count != record.count {
            let slot = self.entries[i].slot;
            if let Some(moved) = self.index.remove(old_count, slot) {
                self.entries[moved].slot = slot;
            }
            self.entries[i].slot = self.index.insert(record.count, i);
        }
        self.entries[i].record = record;
        self.generation += 1;
    }

    pub(crate) fn count_exactly(&self, n: u32) -> usize {
        self.index.count_exactly(n)
    }

    pub(crate) fn count_at_least(&self, n: u32) -> usize {
        self.index.count_at_least(n)
    }

    pub(crate) fn histogram(&self) -> Vec<(u32, usize)> {
        self.index.histogram()
    }

    pub(crate) fn first(&self) -> Option<&ImageId> {
        self.entries.first().map(|e| &e.id)
    }

    pub(crate) fn sample_uniform<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&ImageId> {
        if self.entries.is_empty() {
            return None;
        }
        Some(&self.entries[rng.gen_range(0..self.entries.len())].id)
    }

    pub(crate) fn sample_with_count<R: Rng + ?Sized>(&self, n: u32, rng: &mut R) -> Option<&ImageId> {
        let bucket = self.index.bucket(n);
        if bucket.is_empty() {
            return None;
        }
        Some(&self.entries[bucket[rng.gen_range(0..bucket.len())]].id)
    }

    /// `(identity, label)` for every record whose count satisfies `keep`,
    /// in insertion order.
    pub(crate) fn labels_where(&self, keep: impl Fn(u32) -> bool) -> Vec<(ImageId, Label)> {
        self.entries
            .iter()
            .filter(|e| keep(e.record.count))
            .map(|e| (e.id.clone(), e.record.label))
            .collect()
    }

    /// Owned copy of every row in insertion order.
    pub(crate) fn snapshot(&self) -> Vec<(ImageId, LabelRecord)> {
        self.entries
            .iter()
            .map(|e| (e.id.clone(), e.record))
            .collect()
    }

    /// Verify that every entry sits in exactly the bucket matching its count.
    pub(crate) fn check_consistency(&self) -> Result<(), String> {
        if self.index.total() != self.entries.len() {
            return Err(format!(
                "count index holds {} entries, table holds {}",
                self.index.total(),
                self.entries.len()
            ));
        }
        for (i, entry) in self.entries.iter().enumerate() {
            if self.positions.get(entry.id.as_str()) != Some(&i) {
                return Err(format!("{} is not mapped to position {i}", entry.id));
            }
            if self.index.bucket(entry.record.count).get(entry.slot) != Some(&i) {
                return Err(format!(
                    "{} (count {}) is missing from its count bucket",
                    entry.id, entry.record.count
                ));
            }
        }
        Ok(())
    }
}
