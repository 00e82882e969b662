//! # Domain Types
//!
//! Core domain types used throughout Tally.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  INPUT                          OUTPUT                                  │
//! │  ┌─────────────────┐            ┌─────────────────────────┐             │
//! │  │   OrderData     │            │   DistributionResult    │             │
//! │  │  ─────────────  │  calculate │  ─────────────────────  │             │
//! │  │  people[]       │ ─────────► │  participants[]         │             │
//! │  │  delivery       │            │  within_budget          │             │
//! │  │  service        │            │  order_creator          │             │
//! │  │  discount       │            │  breakdown              │             │
//! │  └─────────────────┘            └─────────────────────────┘             │
//! │                                                                         │
//! │  ┌─────────────────┐            ┌─────────────────────────┐             │
//! │  │   Settings      │            │   ProportionalResult    │             │
//! │  │  daily_budget?  │            │   (alternative policy)  │             │
//! │  └─────────────────┘            └─────────────────────────┘             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lifecycle
//! `OrderData` is rebuilt from the page on every calculation and never
//! persisted. Results live only as long as they are displayed.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;
use crate::DEFAULT_DAILY_BUDGET;

// =============================================================================
// Order Data
// =============================================================================

/// One participant's own order subtotal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PersonOrder {
    /// Participant name as shown on the order page.
    pub name: String,

    /// Subtotal of this participant's items.
    pub amount: Money,
}

/// Everything the calculators need from an order page.
///
/// ## Discount Sign
/// `discount` is the signed adjustment as printed on the receipt and is
/// ADDED to the total: a "-€ 2,00" voucher is stored as `-2.00` and lowers
/// everyone's share, a paid add-on stored as a positive value raises it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderData {
    /// Participants in the order they were found on the page.
    pub people: Vec<PersonOrder>,

    /// Delivery fee, shared by everyone.
    #[serde(default)]
    pub delivery: Money,

    /// Service fee, shared by everyone.
    #[serde(default)]
    pub service: Money,

    /// Signed order-level adjustment, shared by everyone. Vouchers are
    /// negative, add-ons and tips positive.
    #[serde(default)]
    pub discount: Money,
}

impl OrderData {
    /// Creates order data with the given shared fees and no participants.
    pub fn with_fees(delivery: Money, service: Money, discount: Money) -> Self {
        OrderData {
            people: Vec::new(),
            delivery,
            service,
            discount,
        }
    }

    /// Appends a participant. Validation happens in the calculators.
    pub fn add_person(&mut self, name: impl Into<String>, amount: Money) -> &mut Self {
        self.people.push(PersonOrder {
            name: name.into(),
            amount,
        });
        self
    }

    /// Number of participants.
    #[inline]
    pub fn participant_count(&self) -> usize {
        self.people.len()
    }

    /// Returns true when no participant was found.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// Sum of all individual orders.
    pub fn subtotal(&self) -> Money {
        self.people.iter().map(|p| p.amount).sum()
    }

    /// Delivery + service + discount.
    pub fn shared_costs(&self) -> Money {
        self.delivery + self.service + self.discount
    }

    /// Subtotal plus shared costs.
    pub fn grand_total(&self) -> Money {
        self.subtotal() + self.shared_costs()
    }

    /// Participant names in enumeration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.people.iter().map(|p| p.name.as_str())
    }
}

// =============================================================================
// Settings
// =============================================================================

/// User settings that influence a calculation.
///
/// `daily_budget: None` means "never configured" and falls back to
/// [`DEFAULT_DAILY_BUDGET`]. `Some(0)` is a real setting: no company budget.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Per-person company allowance.
    #[serde(default)]
    pub daily_budget: Option<Money>,

    /// Which distribution policy the UI shows.
    #[serde(default)]
    pub policy: DistributionPolicy,
}

impl Settings {
    /// Returns the budget to calculate with.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::{Money, Settings, DEFAULT_DAILY_BUDGET};
    ///
    /// assert_eq!(Settings::default().effective_budget(), DEFAULT_DAILY_BUDGET);
    ///
    /// let no_budget = Settings { daily_budget: Some(Money::zero()), ..Settings::default() };
    /// assert_eq!(no_budget.effective_budget(), Money::zero());
    /// ```
    pub fn effective_budget(&self) -> Money {
        self.daily_budget.unwrap_or(DEFAULT_DAILY_BUDGET)
    }
}

/// The two distribution policies.
///
/// They encode different fairness rules and are never mixed:
/// - `BudgetSharing`: unused budget of light eaters covers heavy eaters,
///   proportionally to each shortfall
/// - `Proportional`: the order's excess over the total budget is split by
///   each participant's share of the spend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DistributionPolicy {
    #[default]
    BudgetSharing,
    Proportional,
}

impl fmt::Display for DistributionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistributionPolicy::BudgetSharing => write!(f, "budget_sharing"),
            DistributionPolicy::Proportional => write!(f, "proportional"),
        }
    }
}

impl std::str::FromStr for DistributionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "budget_sharing" | "sharing" | "mutual_aid" => Ok(DistributionPolicy::BudgetSharing),
            "proportional" | "by_spend" => Ok(DistributionPolicy::Proportional),
            other => Err(format!(
                "Unknown distribution policy: '{}'. Valid options: budget_sharing, proportional",
                other
            )),
        }
    }
}

// =============================================================================
// Participant Status
// =============================================================================

/// Outcome for one participant after budget sharing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantStatus {
    /// Over budget and still owes money after help.
    Pays,
    /// Over budget, but the shared pool covered the whole shortfall.
    Covered,
    /// Under budget; the leftover went into the shared pool.
    HelpsOthers,
    /// Spent exactly the budget.
    Exact,
}

impl fmt::Display for ParticipantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ParticipantStatus::Pays => "pays",
            ParticipantStatus::Covered => "covered",
            ParticipantStatus::HelpsOthers => "helps_others",
            ParticipantStatus::Exact => "exact",
        };
        f.write_str(label)
    }
}

// =============================================================================
// Budget Sharing Result
// =============================================================================

/// Per-participant figures of a budget sharing calculation, rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDetail {
    pub name: String,
    pub individual_order: Money,
    /// This participant's equal share of delivery + service + discount.
    pub shared_costs: Money,
    pub total_cost: Money,
    /// Part of the budget actually used, `min(total_cost, budget)`.
    pub budget_usage: Money,
    /// Unused budget lent to the pool.
    pub extra_budget: Money,
    /// Shortfall before help.
    pub over_budget: Money,
    pub is_order_creator: bool,
    pub budget_help_received: Money,
    /// What this participant still owes after help.
    pub final_payment: Money,
    pub status: ParticipantStatus,
}

/// Order-level aggregate figures, rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Breakdown {
    pub order_subtotal: Money,
    pub delivery: Money,
    pub service: Money,
    pub discount: Money,
    pub grand_total: Money,
    /// Budget × participant count.
    pub total_budget: Money,
    pub shared_costs_total: Money,
    pub shared_costs_per_person: Money,
    pub total_extra_budget: Money,
    pub total_over_budget: Money,
    pub participant_count: usize,
}

/// Outcome of the budget sharing calculator.
///
/// Read-only for consumers. Participants keep the order of the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DistributionResult {
    pub participants: Vec<ParticipantDetail>,
    /// Grand total ≤ total company budget.
    pub within_budget: bool,
    pub order_creator: Option<String>,
    pub breakdown: Breakdown,
}

impl DistributionResult {
    /// Looks up a participant by exact name.
    pub fn participant(&self, name: &str) -> Option<&ParticipantDetail> {
        self.participants.iter().find(|p| p.name == name)
    }

    /// Sum of what everyone still owes.
    pub fn total_final_payment(&self) -> Money {
        self.participants.iter().map(|p| p.final_payment).sum()
    }

    /// Sum of help handed out from the pool.
    pub fn total_help_given(&self) -> Money {
        self.participants.iter().map(|p| p.budget_help_received).sum()
    }

    /// Pretty JSON for the presentation layer.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// =============================================================================
// Proportional Result
// =============================================================================

/// Per-participant figures of the proportional policy, rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProportionalShare {
    pub name: String,
    pub individual_order: Money,
    /// Fraction of the order subtotal, 0..=1 (display only).
    pub spend_ratio: f64,
    /// Share of the excess this participant pays.
    pub payment: Money,
    pub is_order_creator: bool,
    /// True for whoever absorbed the rounding remainder.
    pub received_remainder: bool,
}

/// Outcome of the proportional calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProportionalResult {
    pub shares: Vec<ProportionalShare>,
    pub within_budget: bool,
    pub order_creator: Option<String>,
    pub grand_total: Money,
    pub total_budget: Money,
    /// `max(0, grand_total - total_budget)`; the shares always add up to it.
    pub excess: Money,
    pub participant_count: usize,
}

impl ProportionalResult {
    /// Looks up a participant by exact name.
    pub fn share(&self, name: &str) -> Option<&ProportionalShare> {
        self.shares.iter().find(|s| s.name == name)
    }

    /// Pretty JSON for the presentation layer.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// =============================================================================
// Settlement
// =============================================================================

/// A payment one participant owes the order creator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    pub from: String,
    pub to: String,
    pub amount: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================
