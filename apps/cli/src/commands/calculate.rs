//! # Calculate Command
//!
//! `tally calculate <snapshot> [--budget X] [--policy P] [--json]`

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use crate::commands::{effective_settings, read_snapshot};
use crate::error::AppError;
use crate::render::{render_json, TextReport};
use crate::state::{CalculationSession, SettingsStore};

#[derive(Debug, Clone, Args)]
pub struct CalculateArgs {
    /// Page snapshot: `.json` capture or plain page text
    pub snapshot: PathBuf,

    /// Per-person budget for this run, e.g. 14 or 12,50
    #[arg(long)]
    pub budget: Option<String>,

    /// Distribution policy for this run: budget_sharing | proportional
    #[arg(long)]
    pub policy: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Calculates once and prints the result.
pub fn run(args: &CalculateArgs, store: &SettingsStore) -> Result<String, AppError> {
    let settings = effective_settings(store, args.budget.as_deref(), args.policy.as_deref())?;
    let snapshot = read_snapshot(&args.snapshot)?;

    info!(
        snapshot = ?args.snapshot,
        budget = %settings.effective_budget(),
        policy = %settings.policy,
        "Calculating"
    );

    let displayed = CalculationSession::new().calculate(&snapshot, settings)?;

    if args.json {
        render_json(&displayed)
    } else {
        Ok(TextReport(&displayed).to_string())
    }
}
