//! `hexrecon stats`

use std::io::Write;

use hexrecon_core::{ReconConfig, ReconError};
use hexrecon_storage::LabelStore;
use serde::Serialize;

use super::write_output;
use crate::cli::StatsArgs;

#[derive(Debug, Serialize)]
pub struct StoreStats {
    pub path: String,
    pub identities: usize,
    pub min_confirmations: u32,
    pub confirmed: usize,
    pub buckets: Vec<CountBucket>,
}

#[derive(Debug, Serialize)]
pub struct CountBucket {
    pub count: u32,
    pub identities: usize,
}

impl StoreStats {
    pub fn collect(store: &LabelStore, min_confirmations: u32) -> Result<Self, ReconError> {
        Ok(Self {
            path: store.path().display().to_string(),
            identities: store.len()?,
            min_confirmations,
            confirmed: store.count_at_least(min_confirmations)?,
            buckets: store
                .count_histogram()?
                .into_iter()
                .map(|(count, identities)| CountBucket { count, identities })
                .collect(),
        })
    }
}

pub fn run(args: &StatsArgs, config: &ReconConfig, out: &mut dyn Write) -> Result<(), ReconError> {
    let store = LabelStore::open_read_only(&args.store)?;
    let stats = StoreStats::collect(&store, config.assembly.effective_min_confirmations())?;

    write_output(None, out, |w| {
        if args.json {
            serde_json::to_writer_pretty(&mut *w, &stats)?;
            writeln!(w)
        } else {
            writeln!(w, "{}: {} identities", stats.path, stats.identities)?;
            writeln!(
                w,
                "confirmed (count >= {}): {}",
                stats.min_confirmations, stats.confirmed
            )?;
            for bucket in &stats.buckets {
                writeln!(w, "count {:>4}: {}", bucket.count, bucket.identities)?;
            }
            Ok(())
        }
    })
}
