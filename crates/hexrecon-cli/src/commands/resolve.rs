//! `hexrecon resolve`

use std::io::Write;

use hexrecon_assembly::ConsensusResolver;
use hexrecon_core::{ReconConfig, ReconError};

use super::write_output;
use crate::cli::ResolveArgs;

pub fn run(args: &ResolveArgs, config: &ReconConfig, out: &mut dyn Write) -> Result<(), ReconError> {
    let resolver = ConsensusResolver::new(config.assembly.effective_word_stride());

    let resolution = match (args.first, args.last) {
        (Some(first), Some(last)) => resolver.resolve_span_files(&args.files, first, last)?,
        _ => resolver.resolve_files(&args.files)?,
    };

    write_output(args.output.as_deref(), out, |w| w.write_all(&resolution.bytes))
}
