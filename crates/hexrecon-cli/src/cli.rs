//! Argument definitions for the `hexrecon` binary.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use hexrecon_core::Address;

#[derive(Parser, Debug)]
#[command(
    name = "hexrecon",
    version,
    about = "Reconstruct memory contents from crowd-labelled hex word images",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Config file (default: ./hexrecon.toml if present).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// More log output on stderr (repeat for more).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Gather labels for every recovered address into an assembled label file.
    Assemble(AssembleArgs),

    /// Resolve assembled label files into binary data.
    Resolve(ResolveArgs),

    /// Show identities two label tables confirm with different labels.
    Diff(DiffArgs),

    /// List identities whose confirmed labels disagree across tables.
    Disagreements(DisagreementsArgs),

    /// Summarize a label table's confirmation counts.
    Stats(StatsArgs),
}

impl Commands {
    /// The subcommand's `--min-count`, if it has one and it was given.
    pub fn min_count(&self) -> Option<u32> {
        match self {
            Commands::Assemble(args) => args.min_count,
            Commands::Diff(args) => args.min_count,
            Commands::Disagreements(args) => args.min_count,
            Commands::Resolve(_) | Commands::Stats(_) => None,
        }
    }
}

#[derive(Args, Debug)]
pub struct AssembleArgs {
    /// Ground-truth label table (source 0). Its `XXXX` anchors exclude frames.
    pub ground_truth: PathBuf,

    /// Comma-separated path substrings; only matching images are assembled.
    pub substrings: String,

    /// Further label tables, numbered from 1.
    #[arg(required = true, num_args = 1..)]
    pub stores: Vec<PathBuf>,

    /// Write here instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Load every table at once and scan them in parallel.
    #[arg(long)]
    pub parallel: bool,

    /// Minimum confirmations for a label to count (overrides config).
    #[arg(long, value_name = "N")]
    pub min_count: Option<u32>,
}

impl AssembleArgs {
    /// The substrings, split on commas. An empty piece matches every path.
    pub fn filters(&self) -> Vec<String> {
        self.substrings.split(',').map(str::to_string).collect()
    }
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Assembled label files, emitted in this order.
    #[arg(required = true, num_args = 1..)]
    pub files: Vec<PathBuf>,

    /// Write here instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// First address of a dense span (hex). Requires --last.
    #[arg(long, value_parser = parse_address, requires = "last")]
    pub first: Option<Address>,

    /// Last address of a dense span (hex). Requires --first.
    #[arg(long, value_parser = parse_address, requires = "first")]
    pub last: Option<Address>,
}

#[derive(Args, Debug)]
pub struct DiffArgs {
    pub left: PathBuf,
    pub right: PathBuf,

    /// Minimum confirmations on both sides (overrides config).
    #[arg(long, value_name = "N")]
    pub min_count: Option<u32>,

    /// Also report pairs where one side is `XXXX`.
    #[arg(long)]
    pub keep_ambiguous: bool,

    /// Skip identities labelled `XXXX` in this table.
    #[arg(long, value_name = "DB")]
    pub skip_ambiguous_from: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DisagreementsArgs {
    /// Table whose identities are checked.
    pub primary: PathBuf,

    /// Tables compared against it.
    #[arg(required = true, num_args = 1..)]
    pub others: Vec<PathBuf>,

    /// Minimum confirmations for a label to count (overrides config).
    #[arg(long, value_name = "N")]
    pub min_count: Option<u32>,
}

#[derive(Args, Debug)]
pub struct StatsArgs {
    pub store: PathBuf,

    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

fn parse_address(s: &str) -> Result<Address, String> {
    let digits = s.trim_start_matches("0x").trim_start_matches("0X");
    digits
        .parse()
        .map_err(|e| format!("{s:?} is not a 16-bit hex address: {e}"))
}
