//! # Budget Sharing Calculator
//!
//! The primary distribution policy: everyone gets the same company budget,
//! and budget that light eaters leave unused is pooled to cover the heavy
//! eaters' shortfall.
//!
//! ## Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Step 1: Baseline (per participant, unrounded)                         │
//! │    shared      = (delivery + service + discount) / n                   │
//! │    total_cost  = order + shared                                        │
//! │    extra       = max(0, budget - total_cost)    ──► pool               │
//! │    over        = max(0, total_cost - budget)    ──► shortfall          │
//! │                                                                         │
//! │  Step 2: Budget sharing                                                │
//! │    help        = min(over, Σextra × over / Σover)                       │
//! │    final       = max(0, over - help)                                   │
//! │                                                                         │
//! │  Step 3: Order creator ("you", "me", ...)                              │
//! │                                                                         │
//! │  Step 4: Breakdown, rounded to cents                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Worked Example
//! ```text
//! budget €14, no fees
//!
//!   Alice €24 ── over €10 ──┐                 ┌── help €6 ── pays €4
//!   Bob   €19 ── over  €5 ──┼── Σover €15     ├── help €3 ── pays €2
//!   Carol  €5 ── extra €9 ──┴── Σextra €9 ────┘
//! ```
//! The pool is drained in proportion to need, never first-come-first-served.

use crate::creator::detect_order_creator;
use crate::error::CoreResult;
use crate::money::Money;
use crate::types::{
    Breakdown, DistributionResult, OrderData, ParticipantDetail, ParticipantStatus, PersonOrder,
};
use crate::validation::{validate_budget, validate_order_data};

// =============================================================================
// Step 1: Baseline
// =============================================================================

/// Unrounded per-participant figures before any budget sharing.
#[derive(Debug)]
struct Baseline<'a> {
    name: &'a str,
    individual_order: Money,
    total_cost: Money,
    budget_usage: Money,
    extra_budget: Money,
    over_budget: Money,
}

impl<'a> Baseline<'a> {
    fn new(person: &'a PersonOrder, shared_per_person: Money, budget: Money) -> Self {
        let total_cost = person.amount + shared_per_person;

        Baseline {
            name: &person.name,
            individual_order: person.amount,
            total_cost,
            budget_usage: total_cost.min(budget),
            extra_budget: (budget - total_cost).clamp_non_negative(),
            over_budget: (total_cost - budget).clamp_non_negative(),
        }
    }
}

// =============================================================================
// Step 2: Budget Pool
// =============================================================================

/// Pooled surplus and total shortfall across all participants.
#[derive(Debug, Clone, Copy)]
struct BudgetPool {
    total_extra: Money,
    total_over: Money,
}

/// Help and payment for one participant.
#[derive(Debug, Clone, Copy)]
struct Allocation {
    help: Money,
    final_payment: Money,
    status: ParticipantStatus,
}

impl BudgetPool {
    fn from_baselines(baselines: &[Baseline<'_>]) -> Self {
        BudgetPool {
            total_extra: baselines.iter().map(|b| b.extra_budget).sum(),
            total_over: baselines.iter().map(|b| b.over_budget).sum(),
        }
    }

    /// Help a participant with the given shortfall receives from the pool.
    ///
    /// When the pool covers the whole shortfall the proportional share is
    /// at least `over`, so the result is exactly `over`. Evaluating the
    /// division there would leave a sub-cent residue.
    fn help_for(&self, over: Money) -> Money {
        if self.total_over.is_zero() {
            return Money::zero();
        }

        if self.total_extra >= self.total_over {
            return over;
        }

        self.total_extra
            .scale(over.ratio_of(self.total_over))
            .min(over)
    }

    fn allocate(&self, baseline: &Baseline<'_>) -> Allocation {
        if baseline.over_budget.is_positive() {
            let help = self.help_for(baseline.over_budget);
            let final_payment = (baseline.over_budget - help).clamp_non_negative();
            let status = if final_payment.is_positive() {
                ParticipantStatus::Pays
            } else {
                ParticipantStatus::Covered
            };

            Allocation {
                help,
                final_payment,
                status,
            }
        } else {
            let status = if baseline.extra_budget.is_positive() {
                ParticipantStatus::HelpsOthers
            } else {
                ParticipantStatus::Exact
            };

            Allocation {
                help: Money::zero(),
                final_payment: Money::zero(),
                status,
            }
        }
    }
}

// =============================================================================
// Calculator
// =============================================================================

/// Distributes an order's cost over a per-person budget with budget sharing.
///
/// ## Arguments
/// * `order` - participants and shared fees from the page parser
/// * `budget` - per-person allowance; zero is valid and means no allowance
///
/// ## Errors
/// `CoreError::InvalidInput` when the order is empty, has duplicate or
/// implausible entries, or the budget is negative or implausibly large.
/// Nothing is computed in that case.
///
/// ## Guarantees
/// - Pure: identical input gives an identical result
/// - `final_payment` and `budget_help_received` are never negative
/// - Nobody receives more help than their own shortfall
///
/// ## Example
/// ```rust
/// use tally_core::{calculate_distribution, Money, OrderData};
///
/// let mut order = OrderData::with_fees(Money::from_major(2), Money::from_major(1), Money::zero());
/// order.add_person("Alice", Money::from_major(10));
/// order.add_person("Bob", Money::from_major(8));
///
/// let result = calculate_distribution(&order, Money::from_major(14)).unwrap();
/// assert!(result.within_budget);
/// assert_eq!(result.breakdown.shared_costs_per_person, Money::from_cents(150));
/// ```
pub fn calculate_distribution(order: &OrderData, budget: Money) -> CoreResult<DistributionResult> {
    validate_order_data(order)?;
    validate_budget(budget)?;

    let participant_count = order.participant_count();
    let shared_costs_total = order.shared_costs();
    let shared_per_person = shared_costs_total.divide(participant_count);

    // Step 1
    let baselines: Vec<Baseline<'_>> = order
        .people
        .iter()
        .map(|person| Baseline::new(person, shared_per_person, budget))
        .collect();
    let pool = BudgetPool::from_baselines(&baselines);

    // Step 3 (needed while building the participant details)
    let order_creator = detect_order_creator(order.names());

    // Step 2
    let participants = baselines
        .iter()
        .map(|baseline| {
            let allocation = pool.allocate(baseline);
            let is_order_creator = order_creator.as_deref() == Some(baseline.name);

            ParticipantDetail {
                name: baseline.name.to_string(),
                individual_order: baseline.individual_order.round_cents(),
                shared_costs: shared_per_person.round_cents(),
                total_cost: baseline.total_cost.round_cents(),
                budget_usage: baseline.budget_usage.round_cents(),
                extra_budget: baseline.extra_budget.round_cents(),
                over_budget: baseline.over_budget.round_cents(),
                is_order_creator,
                budget_help_received: allocation.help.round_cents(),
                final_payment: allocation.final_payment.round_cents(),
                status: allocation.status,
            }
        })
        .collect();

    // Step 4
    let grand_total = order.grand_total();
    let total_budget = budget.scale(participant_count.into());

    Ok(DistributionResult {
        participants,
        within_budget: grand_total <= total_budget,
        order_creator,
        breakdown: Breakdown {
            order_subtotal: order.subtotal().round_cents(),
            delivery: order.delivery.round_cents(),
            service: order.service.round_cents(),
            discount: order.discount.round_cents(),
            grand_total: grand_total.round_cents(),
            total_budget: total_budget.round_cents(),
            shared_costs_total: shared_costs_total.round_cents(),
            shared_costs_per_person: shared_per_person.round_cents(),
            total_extra_budget: pool.total_extra.round_cents(),
            total_over_budget: pool.total_over.round_cents(),
            participant_count,
        },
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, ValidationError};

    fn euros(amount: i64) -> Money {
        Money::from_major(amount)
    }

    fn order_of(people: &[(&str, i64)]) -> OrderData {
        let mut order = OrderData::default();
        for (name, cents) in people {
            order.add_person(*name, Money::from_cents(*cents));
        }
        order
    }

    #[test]
    fn test_within_budget() {
        let mut order = order_of(&[("Alice", 1000), ("Bob", 800)]);
        order.delivery = euros(2);
        order.service = euros(1);

        let result = calculate_distribution(&order, euros(14)).unwrap();

        assert!(result.within_budget);
        assert_eq!(result.breakdown.shared_costs_per_person, Money::from_cents(150));

        let alice = result.participant("Alice").unwrap();
        assert_eq!(alice.total_cost, Money::from_cents(1150));
        assert_eq!(alice.over_budget, Money::zero());
        assert_eq!(alice.final_payment, Money::zero());
        assert_eq!(alice.status, ParticipantStatus::HelpsOthers);

        let bob = result.participant("Bob").unwrap();
        assert_eq!(bob.total_cost, Money::from_cents(950));
        assert_eq!(bob.final_payment, Money::zero());
    }

    #[test]
    fn test_over_budget_fully_covered_by_pool() {
        let order = order_of(&[("Alice", 2000), ("Bob", 500)]);

        let result = calculate_distribution(&order, euros(14)).unwrap();

        assert_eq!(result.breakdown.total_over_budget, euros(6));
        assert_eq!(result.breakdown.total_extra_budget, euros(9));

        let alice = result.participant("Alice").unwrap();
        assert_eq!(alice.over_budget, euros(6));
        assert_eq!(alice.budget_help_received, euros(6));
        assert_eq!(alice.final_payment, Money::zero());
        assert_eq!(alice.status, ParticipantStatus::Covered);

        let bob = result.participant("Bob").unwrap();
        assert_eq!(bob.extra_budget, euros(9));
        assert_eq!(bob.status, ParticipantStatus::HelpsOthers);
    }

    #[test]
    fn test_pool_larger_than_shortfall() {
        let order = order_of(&[("Alice", 3000), ("Bob", 500), ("Carol", 500)]);

        let result = calculate_distribution(&order, euros(14)).unwrap();

        assert_eq!(result.breakdown.total_over_budget, euros(16));
        assert_eq!(result.breakdown.total_extra_budget, euros(18));

        let alice = result.participant("Alice").unwrap();
        assert_eq!(alice.budget_help_received, euros(16));
        assert_eq!(alice.final_payment, Money::zero());
        assert_eq!(alice.status, ParticipantStatus::Covered);
        // €40 against 3 × €14
        assert!(result.within_budget);
    }

    #[test]
    fn test_partial_aid_split_by_shortfall() {
        let order = order_of(&[("Alice", 2400), ("Bob", 1900), ("Carol", 500)]);

        let result = calculate_distribution(&order, euros(14)).unwrap();

        let alice = result.participant("Alice").unwrap();
        assert_eq!(alice.budget_help_received, euros(6));
        assert_eq!(alice.final_payment, euros(4));
        assert_eq!(alice.status, ParticipantStatus::Pays);

        let bob = result.participant("Bob").unwrap();
        assert_eq!(bob.budget_help_received, euros(3));
        assert_eq!(bob.final_payment, euros(2));
        assert_eq!(bob.status, ParticipantStatus::Pays);

        assert_eq!(result.total_help_given(), euros(9));
    }

    #[test]
    fn test_no_pool_means_full_shortfall() {
        let order = order_of(&[("Alice", 3000), ("Bob", 2000)]);

        let result = calculate_distribution(&order, euros(14)).unwrap();

        assert_eq!(result.breakdown.total_extra_budget, Money::zero());
        assert_eq!(result.participant("Alice").unwrap().final_payment, euros(16));
        assert_eq!(result.participant("Bob").unwrap().final_payment, euros(6));
    }

    #[test]
    fn test_zero_budget() {
        let mut order = order_of(&[("Alice", 1000), ("Bob", 500)]);
        order.delivery = euros(3);

        let result = calculate_distribution(&order, Money::zero()).unwrap();

        assert!(!result.within_budget);
        assert_eq!(result.breakdown.total_budget, Money::zero());
        assert_eq!(result.breakdown.total_extra_budget, Money::zero());
        for person in &result.participants {
            assert_eq!(person.over_budget, person.total_cost);
            assert_eq!(person.final_payment, person.total_cost);
            assert_eq!(person.status, ParticipantStatus::Pays);
        }
    }

    #[test]
    fn test_zero_budget_and_free_order_is_within_budget() {
        let order = order_of(&[("Alice", 0), ("Bob", 0)]);

        let result = calculate_distribution(&order, Money::zero()).unwrap();

        assert!(result.within_budget);
        for person in &result.participants {
            assert_eq!(person.status, ParticipantStatus::Exact);
        }
    }

    #[test]
    fn test_exact_budget_status() {
        let order = order_of(&[("Alice", 1400)]);

        let result = calculate_distribution(&order, euros(14)).unwrap();

        let alice = result.participant("Alice").unwrap();
        assert_eq!(alice.status, ParticipantStatus::Exact);
        assert_eq!(alice.budget_usage, euros(14));
        assert!(result.within_budget);
    }

    #[test]
    fn test_shared_costs_stay_unrounded_until_reporting() {
        // €10 delivery over 3 people is €3.333… each
        let mut order = order_of(&[("Alice", 1067), ("Bob", 1067), ("Carol", 1067)]);
        order.delivery = euros(10);

        let result = calculate_distribution(&order, euros(14)).unwrap();

        assert_eq!(result.breakdown.shared_costs_per_person, Money::from_cents(333));
        // 10.67 + 3.333… = 14.0033…, over by a fraction of a cent
        let alice = result.participant("Alice").unwrap();
        assert_eq!(alice.total_cost, euros(14));
        assert_eq!(alice.over_budget, Money::zero());
        assert_eq!(alice.status, ParticipantStatus::Pays);
        assert_eq!(result.breakdown.grand_total, Money::from_cents(4201));
    }

    #[test]
    fn test_negative_discount_lowers_shares() {
        let mut order = order_of(&[("Alice", 1000), ("Bob", 1000)]);
        order.discount = Money::from_cents(-400);

        let result = calculate_distribution(&order, euros(14)).unwrap();

        assert_eq!(result.breakdown.shared_costs_per_person, Money::from_cents(-200));
        assert_eq!(result.participant("Alice").unwrap().total_cost, euros(8));
        assert_eq!(result.breakdown.grand_total, euros(16));
    }

    #[test]
    fn test_order_creator_flag() {
        let order = order_of(&[("Bob", 1000), ("You", 1000), ("Carol", 1000)]);

        let result = calculate_distribution(&order, euros(14)).unwrap();

        assert_eq!(result.order_creator.as_deref(), Some("You"));
        assert!(result.participant("You").unwrap().is_order_creator);
        assert!(!result.participant("Bob").unwrap().is_order_creator);
        assert_eq!(result.participants.iter().filter(|p| p.is_order_creator).count(), 1);
    }

    #[test]
    fn test_no_order_creator() {
        let order = order_of(&[("Alice", 1000), ("Bob", 1000)]);

        let result = calculate_distribution(&order, euros(14)).unwrap();

        assert_eq!(result.order_creator, None);
        assert!(result.participants.iter().all(|p| !p.is_order_creator));
    }

    #[test]
    fn test_preserves_participant_order() {
        let order = order_of(&[("Zoe", 100), ("Adam", 200), ("Mila", 300)]);

        let result = calculate_distribution(&order, euros(14)).unwrap();

        let names: Vec<&str> = result.participants.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Zoe", "Adam", "Mila"]);
    }

    #[test]
    fn test_rejects_empty_order() {
        let err = calculate_distribution(&OrderData::default(), euros(14)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test]
    fn test_rejects_negative_budget() {
        let order = order_of(&[("Alice", 1000)]);
        let err = calculate_distribution(&order, Money::from_cents(-1)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test]
    fn test_rejects_huge_budget_and_fees() {
        let order = order_of(&[("Alice", 1000), ("Bob", 500)]);
        let huge = Money::from_decimal(rust_decimal::Decimal::from_i128_with_scale(
            7 * 10i128.pow(28),
            0,
        ));

        let err = calculate_distribution(&order, huge).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(ValidationError::TooLarge { .. })));

        let mut order = order;
        order.delivery = Money::from_decimal(rust_decimal::Decimal::MAX);
        order.service = Money::from_cents(100);

        let err = calculate_distribution(&order, euros(14)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(ValidationError::TooLarge { .. })));
    }

    #[test]
    fn test_identical_input_identical_result() {
        let mut order = order_of(&[("Alice", 2333), ("Bob", 517), ("You", 1299)]);
        order.delivery = Money::from_cents(299);
        order.service = Money::from_cents(99);
        order.discount = Money::from_cents(-150);

        let first = calculate_distribution(&order, euros(14)).unwrap();
        let second = calculate_distribution(&order, euros(14)).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.to_json_pretty().unwrap(), second.to_json_pretty().unwrap());
    }
}
