//! # State Module
//!
//! Application state for the CLI, one type per concern.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────────┐      ┌──────────────────────────────┐    │
//! │  │      SettingsStore       │      │     CalculationSession       │    │
//! │  │                          │      │                              │    │
//! │  │  settings.toml           │      │  in-flight flag (AtomicBool) │    │
//! │  │  + TALLY_* overrides     │─────►│  displayed result (Mutex)    │    │
//! │  │                          │      │  page parser                 │    │
//! │  └──────────────────────────┘      └──────────────────────────────┘    │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • SettingsStore: read per command, no shared mutation                 │
//! │  • CalculationSession: shared via Arc, all methods take &self          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod session;

pub use config::{
    parse_budget, ConfigError, SettingsStore, StoredSettings, ENV_DAILY_BUDGET, ENV_POLICY,
    SETTINGS_FILE,
};
pub use session::{CalculationSession, DisplayedResult, Report};
