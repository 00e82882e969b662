//! # Commands Module
//!
//! One module per CLI subcommand.
//!
//! | Command     | What it does                                         |
//! |-------------|------------------------------------------------------|
//! | `calculate` | parse a page snapshot once and print the split       |
//! | `watch`     | recalculate on an interval while the page changes    |
//! | `settings`  | show or change the stored budget and policy          |

pub mod calculate;
pub mod settings;
pub mod watch;

use std::path::Path;

use tally_core::{DistributionPolicy, Settings};
use tally_page::PageSnapshot;
use tracing::debug;

use crate::error::AppError;
use crate::state::{parse_budget, SettingsStore};

/// Reads a snapshot file. `.json` files are full snapshots, anything else
/// is taken as visible page text.
pub fn read_snapshot(path: &Path) -> Result<PageSnapshot, AppError> {
    let contents = std::fs::read_to_string(path)?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    debug!(?path, is_json, bytes = contents.len(), "Read page snapshot");

    if is_json {
        Ok(PageSnapshot::from_json(&contents)?)
    } else {
        Ok(PageSnapshot::from_text(contents))
    }
}

/// Stored settings with per-run `--budget` and `--policy` applied.
pub fn effective_settings(
    store: &SettingsStore,
    budget: Option<&str>,
    policy: Option<&str>,
) -> Result<Settings, AppError> {
    let mut settings = store.load()?.to_settings();

    if let Some(budget) = budget {
        settings.daily_budget = Some(parse_budget(budget)?);
    }

    if let Some(policy) = policy {
        settings.policy = policy
            .parse::<DistributionPolicy>()
            .map_err(AppError::validation)?;
    }

    Ok(settings)
}
