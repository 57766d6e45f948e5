//! Read access to one observer's labels.
//!
//! The aggregator and the comparison tools only need lookups and ordered
//! scans, so they are written against this trait rather than the concrete
//! CSV-backed store.

use crate::errors::StoreError;
use crate::types::{ImageId, Label, LabelRecord};

/// A read-only view of one observer's converged labels.
pub trait LabelSource: Send + Sync {
    /// Human-readable name of the source (usually its table path).
    fn source_name(&self) -> String;

    /// The record for `id`, or `None` if the source does not track it.
    fn lookup(&self, id: &str) -> Result<Option<LabelRecord>, StoreError>;

    /// Every `(identity, label)` with a count of at least `n`, in the
    /// source's own stable order.
    fn labels_with_count_at_least(&self, n: u32) -> Result<Vec<(ImageId, Label)>, StoreError>;

    /// The label for `id` if it is tracked with a count of at least `n`.
    fn confirmed_label(&self, id: &str, n: u32) -> Result<Option<Label>, StoreError> {
        Ok(self
            .lookup(id)?
            .filter(|record| record.is_confirmed(n))
            .map(|record| record.label))
    }
}
