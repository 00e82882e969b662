//! # Calculation Session
//!
//! The one owned object holding calculation state: whether a calculation is
//! running, and the result currently on display.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   calculate() ──► acquire in-flight flag ──► busy? ──► CalculationIn-   │
//! │                          │                             Progress (no     │
//! │                          ▼                             state touched)   │
//! │                   parse page snapshot                                   │
//! │                          │                                              │
//! │                          ▼                                              │
//! │                   run selected policy                                   │
//! │                          │                                              │
//! │            ok ◄──────────┴──────────► error                             │
//! │             │                           │                               │
//! │   replace displayed result     clear displayed result                   │
//! │             │                           │                               │
//! │             └──── flag released (guard dropped) ◄┘                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Overlapping requests are rejected, never queued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tally_core::{
    calculate_distribution, calculate_proportional, proportional_transfers, settlement_transfers,
    CoreError, DistributionPolicy, DistributionResult, Money, ProportionalResult, Settings,
    Transfer,
};
use tally_page::{PageParser, PageSnapshot};
use tracing::{info, info_span};
use uuid::Uuid;

use crate::error::AppError;

// =============================================================================
// Displayed Result
// =============================================================================

/// Report of whichever policy was used.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "policy", content = "result", rename_all = "snake_case")]
pub enum Report {
    BudgetSharing(DistributionResult),
    Proportional(ProportionalResult),
}

impl Report {
    pub fn policy(&self) -> DistributionPolicy {
        match self {
            Report::BudgetSharing(_) => DistributionPolicy::BudgetSharing,
            Report::Proportional(_) => DistributionPolicy::Proportional,
        }
    }

    pub fn within_budget(&self) -> bool {
        match self {
            Report::BudgetSharing(result) => result.within_budget,
            Report::Proportional(result) => result.within_budget,
        }
    }

    pub fn order_creator(&self) -> Option<&str> {
        match self {
            Report::BudgetSharing(result) => result.order_creator.as_deref(),
            Report::Proportional(result) => result.order_creator.as_deref(),
        }
    }

    /// What everyone owes the order creator.
    pub fn transfers(&self) -> Vec<Transfer> {
        match self {
            Report::BudgetSharing(result) => settlement_transfers(result),
            Report::Proportional(result) => proportional_transfers(result),
        }
    }
}

/// The result currently on display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayedResult {
    /// Correlates log lines of one calculation.
    pub run_id: Uuid,
    pub calculated_at: DateTime<Utc>,
    /// Budget the calculation used, after defaults.
    pub budget: Money,
    pub report: Report,
    pub transfers: Vec<Transfer>,
}

// =============================================================================
// In-Flight Guard
// =============================================================================

/// Holds the in-flight flag for as long as it lives.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    /// Sets the flag, or returns `None` when it was already set.
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

// =============================================================================
// Session
// =============================================================================

/// Calculation state for one page view.
///
/// Share it between tasks behind an `Arc`; all methods take `&self`.
#[derive(Debug)]
pub struct CalculationSession {
    parser: PageParser,
    in_flight: AtomicBool,
    displayed: Mutex<Option<DisplayedResult>>,
}

impl Default for CalculationSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CalculationSession {
    /// Session with the default page parser.
    pub fn new() -> Self {
        Self::with_parser(PageParser::default())
    }

    pub fn with_parser(parser: PageParser) -> Self {
        CalculationSession {
            parser,
            in_flight: AtomicBool::new(false),
            displayed: Mutex::new(None),
        }
    }

    /// True while a calculation is running.
    pub fn is_calculating(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Parses the snapshot and runs the configured policy.
    ///
    /// ## Errors
    /// - `CALCULATION_IN_PROGRESS` when another call has not finished; the
    ///   displayed result is left alone
    /// - page and validation errors; the displayed result is cleared since
    ///   it no longer matches the page
    ///
    /// This is blocking work. From async code run it with
    /// `tokio::task::spawn_blocking`.
    pub fn calculate(
        &self,
        snapshot: &PageSnapshot,
        settings: Settings,
    ) -> Result<DisplayedResult, AppError> {
        let _guard =
            InFlightGuard::acquire(&self.in_flight).ok_or(CoreError::CalculationInProgress)?;

        let run_id = Uuid::new_v4();
        let span = info_span!("calculation", %run_id, policy = %settings.policy);
        let _enter = span.enter();

        match self.run(run_id, snapshot, settings) {
            Ok(displayed) => {
                info!(
                    participants = participant_count(&displayed.report),
                    within_budget = displayed.report.within_budget(),
                    transfers = displayed.transfers.len(),
                    "Calculation finished"
                );
                *self.lock_displayed() = Some(displayed.clone());
                Ok(displayed)
            }
            Err(e) => {
                info!(code = ?e.code, "Calculation failed: {}", e.message);
                self.clear();
                Err(e)
            }
        }
    }

    fn run(
        &self,
        run_id: Uuid,
        snapshot: &PageSnapshot,
        settings: Settings,
    ) -> Result<DisplayedResult, AppError> {
        let order = self.parser.parse(snapshot)?;
        let budget = settings.effective_budget();

        let report = match settings.policy {
            DistributionPolicy::BudgetSharing => {
                Report::BudgetSharing(calculate_distribution(&order, budget)?)
            }
            DistributionPolicy::Proportional => {
                Report::Proportional(calculate_proportional(&order, budget)?)
            }
        };
        let transfers = report.transfers();

        Ok(DisplayedResult {
            run_id,
            calculated_at: Utc::now(),
            budget,
            report,
            transfers,
        })
    }

    /// The result currently on display, if any.
    pub fn current(&self) -> Option<DisplayedResult> {
        self.lock_displayed().clone()
    }

    /// Discards the displayed result, e.g. when the view closes.
    pub fn clear(&self) {
        *self.lock_displayed() = None;
    }

    fn lock_displayed(&self) -> MutexGuard<'_, Option<DisplayedResult>> {
        self.displayed.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn participant_count(report: &Report) -> usize {
    match report {
        Report::BudgetSharing(result) => result.participants.len(),
        Report::Proportional(result) => result.shares.len(),
    }
}
