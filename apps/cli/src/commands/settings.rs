//! # Settings Command
//!
//! `tally settings show | set-budget X | clear-budget | set-policy P`

use clap::Subcommand;
use tally_core::{DistributionPolicy, DEFAULT_DAILY_BUDGET};

use crate::error::AppError;
use crate::state::{parse_budget, SettingsStore, StoredSettings};

#[derive(Debug, Clone, Subcommand)]
pub enum SettingsAction {
    /// Print the effective settings and where they come from
    Show,

    /// Store a per-person budget; 0 disables the company budget
    SetBudget {
        /// Amount, e.g. 14 or 12,50
        budget: String,
    },

    /// Forget the stored budget so the default applies
    ClearBudget,

    /// Store the distribution policy: budget_sharing | proportional
    SetPolicy { policy: String },
}

/// Runs a settings action and returns the text to print.
pub fn run(action: &SettingsAction, store: &SettingsStore) -> Result<String, AppError> {
    let settings = match action {
        SettingsAction::Show => store.load()?,
        SettingsAction::SetBudget { budget } => store.set_daily_budget(parse_budget(budget)?)?,
        SettingsAction::ClearBudget => store.clear_daily_budget()?,
        SettingsAction::SetPolicy { policy } => {
            let policy = policy
                .parse::<DistributionPolicy>()
                .map_err(AppError::validation)?;
            store.set_policy(policy)?
        }
    };

    Ok(describe(&settings, store))
}

fn describe(settings: &StoredSettings, store: &SettingsStore) -> String {
    let budget = match settings.daily_budget {
        Some(budget) => budget.to_string(),
        None => format!("{} (default)", DEFAULT_DAILY_BUDGET),
    };

    format!(
        "Settings file: {}\nDaily budget:  {}\nPolicy:        {}\nWatch every:   {}s\n",
        store.path().display(),
        budget,
        settings.policy,
        settings.watch_interval_secs
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_actions() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.toml"));

        let output = run(
            &SettingsAction::SetBudget {
                budget: "12,50".into(),
            },
            &store,
        )
        .unwrap();
        assert!(output.contains("Daily budget:  €12.50"));

        let output = run(
            &SettingsAction::SetPolicy {
                policy: "proportional".into(),
            },
            &store,
        )
        .unwrap();
        assert!(output.contains("Policy:        proportional"));

        let output = run(&SettingsAction::ClearBudget, &store).unwrap();
        assert!(output.contains("€14.00 (default)"));
    }

    #[test]
    fn test_rejects_bad_values() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.toml"));

        assert!(run(&SettingsAction::SetBudget { budget: "-5".into() }, &store).is_err());
        assert!(run(&SettingsAction::SetPolicy { policy: "fair".into() }, &store).is_err());
        assert!(!store.path().exists());
    }
}
