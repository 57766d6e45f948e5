//! `hexrecon diff`

use std::io::Write;

use hexrecon_assembly::{diff_stores, DiffOptions};
use hexrecon_core::{ReconConfig, ReconError};
use hexrecon_storage::LabelStore;

use super::write_output;
use crate::cli::DiffArgs;

pub fn run(args: &DiffArgs, config: &ReconConfig, out: &mut dyn Write) -> Result<(), ReconError> {
    let mut options = DiffOptions {
        min_count: config.assembly.effective_min_confirmations(),
        skip_ambiguous: !args.keep_ambiguous,
        ..DiffOptions::default()
    };
    if let Some(path) = &args.skip_ambiguous_from {
        let ignore_source = LabelStore::open_read_only(path)?;
        options = options.ignore_ambiguous_in(&ignore_source)?;
    }

    let left = LabelStore::open_read_only(&args.left)?;
    let right = LabelStore::open_read_only(&args.right)?;
    let differences = diff_stores(&left, &right, &options)?;

    write_output(None, out, |w| {
        for difference in &differences {
            writeln!(w, "{difference}")?;
        }
        Ok(())
    })
}
