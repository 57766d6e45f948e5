//! # hexrecon-cli
//!
//! Thin command handlers over the storage and assembly crates. Data goes to
//! stdout (or `--output`); logs go to stderr.

pub mod cli;
pub mod commands;

use std::io::{self, Write};

use hexrecon_core::config::CliOverrides;
use hexrecon_core::constants::VERSION;
use hexrecon_core::tracing::init_tracing_with;
use hexrecon_core::{ReconConfig, ReconError};

pub use cli::{Cli, Commands};

/// Run `cli`, writing command output to stdout.
pub fn run(cli: Cli) -> Result<(), ReconError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_with_output(cli, &mut out)
}

/// Run `cli`, writing command output to `out` unless `--output` is given.
pub fn run_with_output(cli: Cli, out: &mut dyn Write) -> Result<(), ReconError> {
    let config = load_config(&cli)?;
    let verbosity = verbosity_filter(cli.verbose);
    init_tracing_with(verbosity.as_deref(), config.observability.effective_log_level());
    tracing::debug!(version = VERSION, ?config, "configuration loaded");

    match &cli.command {
        Commands::Assemble(args) => commands::assemble::run(args, &config, out),
        Commands::Resolve(args) => commands::resolve::run(args, &config, out),
        Commands::Diff(args) => commands::diff::run(args, &config, out),
        Commands::Disagreements(args) => commands::disagreements::run(args, &config, out),
        Commands::Stats(args) => commands::stats::run(args, &config, out),
    }
}

fn load_config(cli: &Cli) -> Result<ReconConfig, ReconError> {
    let root = std::env::current_dir().map_err(|e| ReconError::io(".", e))?;
    let overrides = CliOverrides {
        min_confirmations: cli.command.min_count(),
        log_level: verbosity_filter(cli.verbose),
    };
    Ok(ReconConfig::load(&root, cli.config.as_deref(), Some(&overrides))?)
}

/// `-v` raises hexrecon's own crates to debug, `-vv` to trace.
pub fn verbosity_filter(verbose: u8) -> Option<String> {
    match verbose {
        0 => None,
        1 => Some("hexrecon=debug".to_string()),
        _ => Some("hexrecon=trace".to_string()),
    }
}
