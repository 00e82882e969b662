//! # tally-core: Pure Business Logic for Tally
//!
//! This crate is the **heart** of Tally. It decides who pays what when a
//! group lunch order runs over the per-person company budget. Everything in
//! here is a pure function with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Tally Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               Order page (captured snapshot)                    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 tally-page (Page Parser)                        │   │
//! │  │      StructuredStrategy ──► TextFallbackStrategy                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ OrderData                              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌──────────────┐  ┌───────────┐  ┌─────────┐  │   │
//! │  │   │   money   │  │ distribution │  │proportional│ │ creator │  │   │
//! │  │   │   Money   │  │ budget share │  │ by spend   │ │ "you"   │  │   │
//! │  │   └───────────┘  └──────────────┘  └───────────┘  └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DOM • NO STORAGE • PURE FUNCTIONS                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ DistributionResult                     │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              apps/cli (settings, session, output)               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type backed by an exact decimal
//! - [`types`] - Order data, settings and report types
//! - [`error`] - Domain error types
//! - [`validation`] - Input checks that run before any math
//! - [`creator`] - Order creator detection
//! - [`distribution`] - Budget sharing calculator (primary policy)
//! - [`proportional`] - Proportional-to-spend calculator (alternative policy)
//! - [`settlement`] - Who owes the order creator what
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, no hidden state
//! 2. **No I/O**: parsing, storage and rendering live in other crates
//! 3. **Round Late**: intermediate sums stay unrounded, reports are rounded to cents
//! 4. **Explicit Errors**: invalid input fails before any distribution math runs
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_core::{calculate_distribution, Money, OrderData, ParticipantStatus};
//!
//! let mut order = OrderData::default();
//! order.add_person("Alice", Money::from_cents(2000));
//! order.add_person("Bob", Money::from_cents(500));
//!
//! let result = calculate_distribution(&order, Money::from_major(14)).unwrap();
//!
//! let alice = result.participant("Alice").unwrap();
//! assert_eq!(alice.over_budget, Money::from_cents(600));
//! assert_eq!(alice.final_payment, Money::zero());
//! assert_eq!(alice.status, ParticipantStatus::Covered);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod creator;
pub mod distribution;
pub mod error;
pub mod money;
pub mod proportional;
pub mod settlement;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use creator::detect_order_creator;
pub use distribution::calculate_distribution;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use proportional::calculate_proportional;
pub use settlement::{proportional_transfers, settlement_transfers};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Per-person company budget used when no budget has been configured.
///
/// An explicit budget of zero is NOT "unset" and never falls back to this.
pub const DEFAULT_DAILY_BUDGET: Money = Money::from_major(14);

/// Maximum participants accepted in one order.
///
/// ## Business Reason
/// Real group orders stay far below this. Anything above it means the page
/// parser picked up item names or menu text as participants.
pub const MAX_PARTICIPANTS: usize = 50;

/// Maximum plausible individual order (€1000).
///
/// ## Business Reason
/// Catches prices parsed with the wrong decimal separator
/// (`1.250` read as 1250 instead of 1.25).
pub const MAX_INDIVIDUAL_ORDER: Money = Money::from_major(1000);

/// Maximum per-person budget (€1000), the same ceiling as one order.
pub const MAX_DAILY_BUDGET: Money = Money::from_major(1000);

/// Maximum delivery or service fee, and maximum discount magnitude: the
/// plausible total of a full order (€50 000).
pub const MAX_SHARED_COST: Money = Money::from_major(50_000);

/// Name fragments that mark the participant who placed the order.
pub const CREATOR_MARKERS: [&str; 4] = ["you", "yu", "me", "myself"];
