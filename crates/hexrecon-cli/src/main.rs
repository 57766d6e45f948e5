use std::process::ExitCode;

use clap::Parser;
use hexrecon_cli::Cli;
use hexrecon_core::errors::ReconErrorCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match hexrecon_cli::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.coded_string());
            ExitCode::FAILURE
        }
    }
}
