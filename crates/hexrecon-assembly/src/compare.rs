//! Comparing label sources: pairwise diffs and multi-source disagreements.

use std::fmt;

use hexrecon_core::constants::DEFAULT_MIN_CONFIRMATIONS;
use hexrecon_core::types::FxHashSet;
use hexrecon_core::{ImageId, Label, LabelSource, StoreError};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct DiffOptions {
    /// Both labels must have at least this many confirmations.
    pub min_count: u32,
    /// Skip pairs where either side is `XXXX`.
    pub skip_ambiguous: bool,
    /// Identities never reported.
    pub ignore: FxHashSet<ImageId>,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            min_count: DEFAULT_MIN_CONFIRMATIONS,
            skip_ambiguous: true,
            ignore: FxHashSet::default(),
        }
    }
}

impl DiffOptions {
    /// Ignore every identity that `source` labels `XXXX`, at any count.
    pub fn ignore_ambiguous_in(mut self, source: &dyn LabelSource) -> Result<Self, StoreError> {
        let before = self.ignore.len();
        self.ignore.extend(
            source
                .labels_with_count_at_least(0)?
                .into_iter()
                .filter(|(_, label)| label.is_ambiguous())
                .map(|(id, _)| id),
        );
        debug!(
            source = %source.source_name(),
            added = self.ignore.len() - before,
            "ignoring ambiguous identities"
        );
        Ok(self)
    }
}

/// One identity labelled differently by two sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelDifference {
    pub id: ImageId,
    pub left: Label,
    pub right: Label,
}

impl fmt::Display for LabelDifference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}   {} <> {}", self.id, self.left, self.right)
    }
}

/// Identities confirmed in both sources with different labels, in `left`'s
/// order.
pub fn diff_stores(
    left: &dyn LabelSource,
    right: &dyn LabelSource,
    options: &DiffOptions,
) -> Result<Vec<LabelDifference>, StoreError> {
    let mut differences = Vec::new();
    for (id, left_label) in left.labels_with_count_at_least(options.min_count)? {
        let Some(right_label) = right.confirmed_label(id.as_str(), options.min_count)? else {
            continue;
        };
        if left_label == right_label {
            continue;
        }
        if options.skip_ambiguous && (left_label.is_ambiguous() || right_label.is_ambiguous()) {
            continue;
        }
        if options.ignore.contains(&id) {
            continue;
        }
        differences.push(LabelDifference {
            id,
            left: left_label,
            right: right_label,
        });
    }
    debug!(
        left = %left.source_name(),
        right = %right.source_name(),
        differences = differences.len(),
        "compared label sources"
    );
    Ok(differences)
}

/// Identities of `primary` whose confirmed labels across `primary` and
/// `others` take more than one value. Identities `primary` has confirmed as
/// `XXXX` are already settled and never reported.
pub fn find_disagreements(
    primary: &dyn LabelSource,
    others: &[&dyn LabelSource],
    min_count: u32,
) -> Result<Vec<ImageId>, StoreError> {
    let mut disagreements = Vec::new();
    for (id, label) in primary.labels_with_count_at_least(0)? {
        let primary_confirmed = primary.confirmed_label(id.as_str(), min_count)?;
        if primary_confirmed.is_some_and(|l| l.is_ambiguous()) {
            continue;
        }
        let mut seen: Option<Label> = primary_confirmed;
        let mut disagree = false;
        for other in others {
            if let Some(theirs) = other.confirmed_label(id.as_str(), min_count)? {
                match seen {
                    Some(ours) if ours != theirs => {
                        disagree = true;
                        break;
                    }
                    Some(_) => {}
                    None => seen = Some(theirs),
                }
            }
        }
        if disagree {
            debug!(id = %id, primary = %label, "labels disagree");
            disagreements.push(id);
        }
    }
    Ok(disagreements)
}
