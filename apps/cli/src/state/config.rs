//! # Settings Store
//!
//! Persists the user's budget settings between runs.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command line flags (highest priority, per run only)                │
//! │     --budget 12,50   --policy proportional                             │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     TALLY_DAILY_BUDGET=12.50                                           │
//! │     TALLY_POLICY=proportional                                          │
//! │                                                                         │
//! │  3. TOML Settings File                                                 │
//! │     ~/.config/tally/settings.toml (Linux)                              │
//! │     ~/Library/Application Support/com.tally.tally/settings.toml (macOS)│
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     budget unset (€14.00), budget sharing                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Settings File Format
//! ```toml
//! # settings.toml
//! daily_budget = 14.0        # omit to use the default; 0 means no budget
//! policy = "budget_sharing"  # budget_sharing | proportional
//! watch_interval_secs = 5
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tally_core::validation::validate_budget;
use tally_core::{DistributionPolicy, Money, Settings};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Settings file name inside the platform config directory.
pub const SETTINGS_FILE: &str = "settings.toml";

/// Environment variable overriding the daily budget.
pub const ENV_DAILY_BUDGET: &str = "TALLY_DAILY_BUDGET";

/// Environment variable overriding the distribution policy.
pub const ENV_POLICY: &str = "TALLY_POLICY";

// =============================================================================
// Errors
// =============================================================================

/// Settings store failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No platform config directory could be determined.
    #[error("Could not determine the config directory. Pass --config <path>.")]
    NoConfigDir,

    /// Failed to read or parse the settings file.
    #[error("Failed to load settings from {path}: {reason}")]
    LoadFailed { path: String, reason: String },

    /// Failed to write the settings file.
    #[error("Failed to save settings to {path}: {reason}")]
    SaveFailed { path: String, reason: String },

    /// Settings parsed but are not usable.
    #[error("Invalid settings: {0}")]
    Invalid(String),
}

// =============================================================================
// Stored Settings
// =============================================================================

/// Contents of `settings.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSettings {
    /// Per-person budget. `None` means unset, not zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_budget: Option<Money>,

    #[serde(default)]
    pub policy: DistributionPolicy,

    /// Seconds between recalculations in `tally watch`.
    #[serde(default = "default_watch_interval")]
    pub watch_interval_secs: u64,
}

fn default_watch_interval() -> u64 {
    5
}

impl Default for StoredSettings {
    fn default() -> Self {
        StoredSettings {
            daily_budget: None,
            policy: DistributionPolicy::default(),
            watch_interval_secs: default_watch_interval(),
        }
    }
}

impl StoredSettings {
    /// The calculation settings these stored values describe.
    pub fn to_settings(&self) -> Settings {
        Settings {
            daily_budget: self.daily_budget,
            policy: self.policy,
        }
    }

    /// Checks the values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(budget) = self.daily_budget {
            validate_budget(budget).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        }

        if self.watch_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "watch_interval_secs must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Applies `TALLY_*` overrides from the given variable lookup.
    ///
    /// Unparseable values are logged and ignored.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(budget) = lookup(ENV_DAILY_BUDGET) {
            match parse_budget(&budget) {
                Ok(parsed) => {
                    debug!(budget = %parsed, "Overriding daily budget from environment");
                    self.daily_budget = Some(parsed);
                }
                Err(e) => warn!(value = %budget, error = %e, "Ignoring {}", ENV_DAILY_BUDGET),
            }
        }

        if let Some(policy) = lookup(ENV_POLICY) {
            match policy.parse() {
                Ok(parsed) => {
                    debug!(policy = %parsed, "Overriding policy from environment");
                    self.policy = parsed;
                }
                Err(e) => warn!(value = %policy, error = %e, "Ignoring {}", ENV_POLICY),
            }
        }
    }
}

/// Parses a budget the way a user types it: `14`, `12.50`, `12,50`, `€ 12,50`.
pub fn parse_budget(text: &str) -> Result<Money, ConfigError> {
    let budget = tally_page::parse_price(text)
        .map_err(|_| ConfigError::Invalid(format!("'{}' is not an amount", text.trim())))?;
    validate_budget(budget).map_err(|e| ConfigError::Invalid(e.to_string()))?;
    Ok(budget)
}

// =============================================================================
// Store
// =============================================================================

/// The settings file on disk.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Store backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SettingsStore { path: path.into() }
    }

    /// Store at `path`, or at the platform default location.
    pub fn open(path: Option<PathBuf>) -> Result<Self, ConfigError> {
        path.or_else(Self::default_path)
            .map(SettingsStore::new)
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Platform-specific settings path.
    ///
    /// - **Linux**: `~/.config/tally/settings.toml`
    /// - **macOS**: `~/Library/Application Support/com.tally.tally/settings.toml`
    /// - **Windows**: `%APPDATA%\tally\tally\config\settings.toml`
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "tally", "tally").map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the file, then applies environment overrides.
    pub fn load(&self) -> Result<StoredSettings, ConfigError> {
        self.load_with(|key| std::env::var(key).ok())
    }

    /// [`load`](Self::load) with a custom environment, for tests.
    pub fn load_with<F>(&self, lookup: F) -> Result<StoredSettings, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = self.read_file()?;
        settings.apply_overrides(lookup);
        settings.validate()?;
        Ok(settings)
    }

    /// Writes the settings file, creating its directory.
    pub fn save(&self, settings: &StoredSettings) -> Result<(), ConfigError> {
        settings.validate()?;

        let save_failed = |reason: String| ConfigError::SaveFailed {
            path: self.path.display().to_string(),
            reason,
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(settings).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(&self.path, contents).map_err(|e| save_failed(e.to_string()))?;

        info!(path = ?self.path, "Settings saved");
        Ok(())
    }

    /// Stores an explicit budget. Zero is kept as zero.
    pub fn set_daily_budget(&self, budget: Money) -> Result<StoredSettings, ConfigError> {
        self.update(|settings| settings.daily_budget = Some(budget))
    }

    /// Removes the budget so the default applies again.
    pub fn clear_daily_budget(&self) -> Result<StoredSettings, ConfigError> {
        self.update(|settings| settings.daily_budget = None)
    }

    pub fn set_policy(&self, policy: DistributionPolicy) -> Result<StoredSettings, ConfigError> {
        self.update(|settings| settings.policy = policy)
    }

    /// Read-modify-write on the file contents only, so environment
    /// overrides never end up persisted.
    fn update<F>(&self, change: F) -> Result<StoredSettings, ConfigError>
    where
        F: FnOnce(&mut StoredSettings),
    {
        let mut settings = self.read_file()?;
        change(&mut settings);
        self.save(&settings)?;
        Ok(settings)
    }

    fn read_file(&self) -> Result<StoredSettings, ConfigError> {
        if !self.path.exists() {
            debug!(path = ?self.path, "Settings file not found, using defaults");
            return Ok(StoredSettings::default());
        }

        let load_failed = |reason: String| ConfigError::LoadFailed {
            path: self.path.display().to_string(),
            reason,
        };

        let contents = std::fs::read_to_string(&self.path).map_err(|e| load_failed(e.to_string()))?;
        toml::from_str(&contents).map_err(|e| load_failed(e.to_string()))
    }
}
