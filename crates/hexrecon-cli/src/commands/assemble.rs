//! `hexrecon assemble`

use std::io::Write;

use hexrecon_assembly::AddressAggregator;
use hexrecon_core::{LabelSource, ReconConfig, ReconError};
use hexrecon_storage::LabelStore;

use super::write_output;
use crate::cli::AssembleArgs;

pub fn run(args: &AssembleArgs, config: &ReconConfig, out: &mut dyn Write) -> Result<(), ReconError> {
    let aggregator = AddressAggregator::from_config(args.filters(), &config.assembly);

    let aggregation = if args.parallel {
        let truth = LabelStore::open_read_only(&args.ground_truth)?;
        let stores = args
            .stores
            .iter()
            .map(LabelStore::open_read_only)
            .collect::<Result<Vec<_>, _>>()?;
        let auxiliaries: Vec<&dyn LabelSource> = stores.iter().map(|s| s as &dyn LabelSource).collect();
        aggregator.aggregate(&truth, &auxiliaries)?
    } else {
        aggregator.aggregate_paths(&args.ground_truth, &args.stores)?
    };

    write_output(args.output.as_deref(), out, |w| aggregation.file.write_to(w))
}
