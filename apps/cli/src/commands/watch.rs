//! # Watch Command
//!
//! `tally watch <snapshot> [--interval-secs N] [--ticks N]`
//!
//! Stands in for the page-load timer of the extension: the snapshot file is
//! re-read and recalculated on every tick, and the result is printed when
//! it changes.
//!
//! ```text
//!   tick ──► spawn_blocking(read + calculate) ──► JoinSet
//!   tick ──► spawn_blocking(...) ──► CalculationInProgress if the previous
//!                                    one is still running (skipped)
//!   JoinSet result ──► print if different from the last printed report
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::commands::{effective_settings, read_snapshot};
use crate::error::{AppError, ErrorCode};
use crate::render::{render_json, TextReport};
use crate::state::{CalculationSession, DisplayedResult, Report, SettingsStore};

#[derive(Debug, Clone, Args)]
pub struct WatchArgs {
    /// Page snapshot that is re-read on every tick
    pub snapshot: PathBuf,

    /// Seconds between recalculations (default from settings)
    #[arg(long)]
    pub interval_secs: Option<u64>,

    /// Stop after this many ticks
    #[arg(long)]
    pub ticks: Option<u64>,

    /// Per-person budget for this run
    #[arg(long)]
    pub budget: Option<String>,

    /// Distribution policy for this run
    #[arg(long)]
    pub policy: Option<String>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Recalculates on an interval until `--ticks` is reached, or forever.
pub async fn run(args: WatchArgs, store: SettingsStore) -> Result<(), AppError> {
    let stored = store.load()?;
    let settings = effective_settings(&store, args.budget.as_deref(), args.policy.as_deref())?;
    let interval_secs = args.interval_secs.unwrap_or(stored.watch_interval_secs).max(1);

    info!(snapshot = ?args.snapshot, interval_secs, "Watching page snapshot");

    let session = Arc::new(CalculationSession::new());
    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut tasks: JoinSet<Result<DisplayedResult, AppError>> = JoinSet::new();
    let mut ticks = 0u64;
    let mut last_printed: Option<Report> = None;

    loop {
        tokio::select! {
            _ = ticker.tick(), if args.ticks.map_or(true, |max| ticks < max) => {
                ticks += 1;
                let session = Arc::clone(&session);
                let path = args.snapshot.clone();
                tasks.spawn_blocking(move || {
                    let snapshot = read_snapshot(&path)?;
                    session.calculate(&snapshot, settings)
                });
            }
            Some(joined) = tasks.join_next() => {
                match joined? {
                    Ok(displayed) => {
                        if last_printed.as_ref() != Some(&displayed.report) {
                            print_result(&displayed, args.json)?;
                            last_printed = Some(displayed.report);
                        }
                    }
                    Err(e) if e.code == ErrorCode::CalculationInProgress => {
                        info!("Calculation already in progress, skipping tick");
                    }
                    Err(e) if e.code == ErrorCode::NoParticipants => {
                        info!("No participants on the page yet");
                    }
                    Err(e) => {
                        warn!(code = ?e.code, "Calculation failed: {}", e.message);
                    }
                }
            }
            else => break,
        }
    }

    session.clear();
    Ok(())
}

fn print_result(displayed: &DisplayedResult, json: bool) -> Result<(), AppError> {
    if json {
        println!("{}", render_json(displayed)?);
    } else {
        println!("── {} ──", displayed.calculated_at.format("%H:%M:%S"));
        print!("{}", TextReport(displayed));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_watch_stops_after_ticks() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.toml"));
        let snapshot = dir.path().join("page.txt");
        std::fs::write(&snapshot, "Alice\nPizza € 20,00").unwrap();

        let args = WatchArgs {
            snapshot,
            interval_secs: Some(1),
            ticks: Some(1),
            budget: None,
            policy: None,
            json: true,
        };

        run(args, store).await.unwrap();
    }

    #[tokio::test]
    async fn test_watch_survives_missing_page() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.toml"));

        let args = WatchArgs {
            snapshot: dir.path().join("not-there.txt"),
            interval_secs: Some(1),
            ticks: Some(1),
            budget: None,
            policy: None,
            json: false,
        };

        assert!(run(args, store).await.is_ok());
    }
}
