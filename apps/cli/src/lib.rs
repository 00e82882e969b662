//! # Tally CLI Library
//!
//! Command line front end for Tally: reads a captured order page, applies
//! the user's budget settings and prints who pays what.
//!
//! ## Module Organization
//! ```text
//! tally_cli/
//! ├── lib.rs          ◄─── You are here (arguments, logging, dispatch)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── config.rs   ◄─── Settings store (settings.toml + env)
//! │   └── session.rs  ◄─── Calculation session (in-flight flag, result)
//! ├── commands/
//! │   ├── mod.rs      ◄─── Shared helpers
//! │   ├── calculate.rs
//! │   ├── watch.rs
//! │   └── settings.rs
//! ├── render.rs       ◄─── Text table and JSON output
//! └── error.rs        ◄─── App error type for commands
//! ```

pub mod commands;
pub mod error;
pub mod render;
pub mod state;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use commands::calculate::CalculateArgs;
use commands::settings::SettingsAction;
use commands::watch::WatchArgs;
use error::AppError;
use state::SettingsStore;

/// Split a group order against a per-person company budget.
#[derive(Debug, Parser)]
#[command(name = "tally", version)]
#[command(about = "Split a group order against a per-person company budget")]
pub struct Cli {
    /// Settings file (default: platform config directory)
    #[arg(long, global = true, env = "TALLY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Calculate the split for a page snapshot
    Calculate(CalculateArgs),

    /// Recalculate a page snapshot on an interval
    Watch(WatchArgs),

    /// Show or change stored settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

/// Runs the parsed command line.
///
/// ## Startup Sequence
/// ```text
/// 1. Resolve settings file (--config, TALLY_CONFIG, platform default)
/// 2. Dispatch the subcommand
/// 3. Print its output on stdout
/// ```
pub async fn run(cli: Cli) -> Result<(), AppError> {
    let store = SettingsStore::open(cli.config)?;
    info!(settings = ?store.path(), "Starting Tally");

    match cli.command {
        Command::Calculate(args) => {
            print!("{}", ensure_newline(commands::calculate::run(&args, &store)?));
        }
        Command::Watch(args) => commands::watch::run(args, store).await?,
        Command::Settings { action } => {
            print!("{}", commands::settings::run(&action, &store)?);
        }
    }

    Ok(())
}

fn ensure_newline(mut output: String) -> String {
    if !output.ends_with('\n') {
        output.push('\n');
    }
    output
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=tally_page=trace` - Show trace for the page parser only
/// - Default: INFO, DEBUG for tally crates with `--verbose`
///
/// Logs go to stderr so stdout stays clean for `--json`.
pub fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "info,tally_page=debug,tally_cli=debug"
    } else {
        "warn,tally_cli=info"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
