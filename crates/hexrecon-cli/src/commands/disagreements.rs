//! `hexrecon disagreements`

use std::io::Write;

use hexrecon_assembly::find_disagreements;
use hexrecon_core::{LabelSource, ReconConfig, ReconError};
use hexrecon_storage::LabelStore;
use tracing::info;

use super::write_output;
use crate::cli::DisagreementsArgs;

pub fn run(args: &DisagreementsArgs, config: &ReconConfig, out: &mut dyn Write) -> Result<(), ReconError> {
    let min_count = config.assembly.effective_min_confirmations();

    let primary = LabelStore::open_read_only(&args.primary)?;
    let others = args
        .others
        .iter()
        .map(LabelStore::open_read_only)
        .collect::<Result<Vec<_>, _>>()?;
    let others: Vec<&dyn LabelSource> = others.iter().map(|s| s as &dyn LabelSource).collect();

    let ids = find_disagreements(&primary, &others, min_count)?;
    info!(count = ids.len(), "ambiguous word images");

    write_output(None, out, |w| {
        for id in &ids {
            writeln!(w, "{id}")?;
        }
        Ok(())
    })
}
