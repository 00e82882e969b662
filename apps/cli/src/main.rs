//! # Tally CLI Entry Point
//!
//! ```text
//! tally calculate lunch.json            # split once, text table
//! tally calculate lunch.json --json     # split once, JSON
//! tally watch lunch.json --interval-secs 2
//! tally settings set-budget 12,50
//! ```
//!
//! The actual setup is in lib.rs for better testability.

use std::process::ExitCode;

use clap::Parser;
use tally_cli::{init_tracing, run, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = ?e.code, "{}", e.message);
            eprintln!("{}", e.message);
            ExitCode::from(e.exit_code())
        }
    }
}
