//! Plurality resolution of assembled labels into raw bytes.

use std::collections::hash_map::Entry;
use std::path::Path;

use hexrecon_core::constants::DEFAULT_WORD_STRIDE;
use hexrecon_core::types::FxHashMap;
use hexrecon_core::{Address, AssemblyError, Label};
use tracing::{debug, info};

use crate::assembled::{AddressEntry, AssembledLabelFile};

/// Bytes emitted for an address with no labels.
const PLACEHOLDER: [u8; 2] = [0, 0];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionReport {
    /// Byte pairs emitted.
    pub words: usize,
    /// Addresses that had no labels and were written as `00 00`.
    pub placeholders: Vec<Address>,
    /// Addresses with more than one distinct label.
    pub contested: Vec<Address>,
}

impl ResolutionReport {
    fn merge(&mut self, other: ResolutionReport) {
        self.words += other.words;
        self.placeholders.extend(other.placeholders);
        self.contested.extend(other.contested);
    }

    fn log(&self) {
        info!(
            words = self.words,
            placeholders = self.placeholders.len(),
            contested = self.contested.len(),
            "resolved labels"
        );
        for address in &self.placeholders {
            debug!(%address, "no labels, wrote zero placeholder");
        }
        for address in &self.contested {
            debug!(%address, "contested address resolved by plurality");
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub bytes: Vec<u8>,
    pub report: ResolutionReport,
}

impl Resolution {
    /// Append `other` after this resolution.
    pub fn append(&mut self, other: Resolution) {
        self.bytes.extend(other.bytes);
        self.report.merge(other.report);
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ConsensusResolver {
    word_stride: u16,
}

impl Default for ConsensusResolver {
    fn default() -> Self {
        Self::new(DEFAULT_WORD_STRIDE)
    }
}

impl ConsensusResolver {
    /// `word_stride` is the address step used by [`resolve_span`](Self::resolve_span).
    pub fn new(word_stride: u16) -> Self {
        Self {
            word_stride: word_stride.max(1),
        }
    }

    /// The label with the most locators. On a tie the label listed first
    /// wins. `None` when the entry has no labels.
    pub fn winner(entry: &AddressEntry) -> Option<Label> {
        let mut best: Option<(Label, usize)> = None;
        for candidate in &entry.labels {
            let votes = candidate.locators.len();
            if best.map_or(true, |(_, most)| votes > most) {
                best = Some((candidate.label, votes));
            }
        }
        best.map(|(label, _)| label)
    }

    /// Two bytes for one entry.
    pub fn resolve_entry(entry: &AddressEntry) -> Result<[u8; 2], AssemblyError> {
        match Self::winner(entry) {
            None => Ok(PLACEHOLDER),
            Some(label) => label.to_be_bytes().ok_or_else(|| AssemblyError::NonHexLabel {
                address: entry.address.value(),
                label: label.to_string(),
            }),
        }
    }

    /// Resolve every entry in presentation order.
    pub fn resolve(&self, file: &AssembledLabelFile) -> Result<Resolution, AssemblyError> {
        let resolution = self.resolve_entries(&file.entries)?;
        resolution.report.log();
        Ok(resolution)
    }

    /// Resolve several assembled files, concatenated in argument order.
    pub fn resolve_files<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Resolution, AssemblyError> {
        let mut total = Resolution::default();
        for path in paths {
            let path = path.as_ref();
            info!(path = %path.display(), "resolving assembled file");
            let file = AssembledLabelFile::read(path)?;
            total.append(self.resolve_entries(&file.entries)?);
        }
        total.report.log();
        Ok(total)
    }

    /// Dense reconstruction of `first..=last`, one word every stride.
    /// Addresses the file has no entry for come out as `00 00`.
    pub fn resolve_span(
        &self,
        file: &AssembledLabelFile,
        first: Address,
        last: Address,
    ) -> Result<Resolution, AssemblyError> {
        let by_address: FxHashMap<Address, &AddressEntry> =
            file.entries.iter().map(|e| (e.address, e)).collect();
        self.span(&by_address, first, last)
    }

    /// One dense span over several assembled files. Entries for the same
    /// address are merged in argument order before the vote.
    pub fn resolve_span_files<P: AsRef<Path>>(
        &self,
        paths: &[P],
        first: Address,
        last: Address,
    ) -> Result<Resolution, AssemblyError> {
        let mut merged: FxHashMap<Address, AddressEntry> = FxHashMap::default();
        for path in paths {
            let path = path.as_ref();
            info!(path = %path.display(), "reading assembled file for span");
            for entry in AssembledLabelFile::read(path)?.entries {
                match merged.entry(entry.address) {
                    Entry::Occupied(mut slot) => slot.get_mut().merge(entry),
                    Entry::Vacant(slot) => {
                        slot.insert(entry);
                    }
                }
            }
        }
        let by_address: FxHashMap<Address, &AddressEntry> =
            merged.iter().map(|(address, entry)| (*address, entry)).collect();
        self.span(&by_address, first, last)
    }

    fn span(
        &self,
        by_address: &FxHashMap<Address, &AddressEntry>,
        first: Address,
        last: Address,
    ) -> Result<Resolution, AssemblyError> {
        let mut resolution = Resolution::default();
        let mut next = Some(first);
        while let Some(address) = next.filter(|a| *a <= last) {
            match by_address.get(&address) {
                Some(entry) => self.push_entry(&mut resolution, entry)?,
                None => {
                    resolution.bytes.extend_from_slice(&PLACEHOLDER);
                    resolution.report.placeholders.push(address);
                    resolution.report.words += 1;
                }
            }
            next = address.offset(self.word_stride);
        }
        resolution.report.log();
        Ok(resolution)
    }

    fn resolve_entries(&self, entries: &[AddressEntry]) -> Result<Resolution, AssemblyError> {
        let mut resolution = Resolution {
            bytes: Vec::with_capacity(entries.len() * 2),
            report: ResolutionReport::default(),
        };
        for entry in entries {
            self.push_entry(&mut resolution, entry)?;
        }
        Ok(resolution)
    }

    fn push_entry(&self, resolution: &mut Resolution, entry: &AddressEntry) -> Result<(), AssemblyError> {
        let bytes = Self::resolve_entry(entry)?;
        if entry.labels.is_empty() {
            resolution.report.placeholders.push(entry.address);
        }
        if entry.is_contested() {
            resolution.report.contested.push(entry.address);
        }
        resolution.bytes.extend_from_slice(&bytes);
        resolution.report.words += 1;
        Ok(())
    }
}
