//! # Proportional Calculator
//!
//! The alternative distribution policy. Instead of pooling unused budget,
//! the whole order is compared against the whole company budget and any
//! excess is split by how much each participant spent.
//!
//! ```text
//! grand total €50, budget 3 × €14 = €42  ──►  excess €8
//!
//!   Alice €20 of €40 subtotal (50%) ── pays €4.00
//!   Bob   €12 of €40 subtotal (30%) ── pays €2.40
//!   Carol  €8 of €40 subtotal (20%) ── pays €1.60
//! ```
//!
//! Shares are rounded to cents one by one; whatever cent is left over goes
//! to the order creator (or the first participant) so the shares always add
//! up to the excess exactly.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::creator::detect_order_creator;
use crate::error::CoreResult;
use crate::money::Money;
use crate::types::{OrderData, ProportionalResult, ProportionalShare};
use crate::validation::{validate_budget, validate_order_data};

/// Splits the order's excess over the total budget in proportion to spend.
///
/// ## Rules
/// - Within budget (`grand_total <= budget × n`): everyone pays zero
/// - Otherwise `excess × order / subtotal`, rounded to cents
/// - Zero subtotal (only fees): the excess is split evenly
/// - Rounding remainder goes to the order creator, or to the first
///   participant when no creator is detected
///
/// ## Errors
/// `CoreError::InvalidInput` for the same inputs the budget sharing
/// calculator rejects.
///
/// ## Example
/// ```rust
/// use tally_core::{calculate_proportional, Money, OrderData};
///
/// let mut order = OrderData::default();
/// order.add_person("Alice", Money::from_major(20));
/// order.add_person("Bob", Money::from_major(10));
///
/// let result = calculate_proportional(&order, Money::from_major(12)).unwrap();
/// assert_eq!(result.excess, Money::from_major(6));
/// assert_eq!(result.share("Alice").unwrap().payment, Money::from_major(4));
/// ```
pub fn calculate_proportional(order: &OrderData, budget: Money) -> CoreResult<ProportionalResult> {
    validate_order_data(order)?;
    validate_budget(budget)?;

    let participant_count = order.participant_count();
    let subtotal = order.subtotal();
    let grand_total = order.grand_total();
    let total_budget = budget.scale(participant_count.into());
    let excess = (grand_total - total_budget).clamp_non_negative();

    let order_creator = detect_order_creator(order.names());
    let remainder_index = order_creator
        .as_deref()
        .and_then(|creator| order.people.iter().position(|p| p.name == creator))
        .unwrap_or(0);

    let even_ratio = Decimal::ONE / Decimal::from(participant_count);
    let ratios: Vec<Decimal> = order
        .people
        .iter()
        .map(|person| {
            if subtotal.is_zero() {
                even_ratio
            } else {
                person.amount.ratio_of(subtotal)
            }
        })
        .collect();

    let mut payments: Vec<Money> = ratios
        .iter()
        .map(|ratio| excess.scale(*ratio).round_cents())
        .collect();

    let rounded_excess = excess.round_cents();
    let distributed: Money = payments.iter().sum();
    let remainder = rounded_excess - distributed;
    if !remainder.is_zero() {
        payments[remainder_index] += remainder;
    }

    let shares = order
        .people
        .iter()
        .zip(ratios)
        .zip(payments)
        .enumerate()
        .map(|(index, ((person, ratio), payment))| ProportionalShare {
            name: person.name.clone(),
            individual_order: person.amount.round_cents(),
            spend_ratio: ratio.to_f64().unwrap_or_default(),
            payment,
            is_order_creator: order_creator.as_deref() == Some(person.name.as_str()),
            received_remainder: index == remainder_index && !remainder.is_zero(),
        })
        .collect();

    Ok(ProportionalResult {
        shares,
        within_budget: grand_total <= total_budget,
        order_creator,
        grand_total: grand_total.round_cents(),
        total_budget: total_budget.round_cents(),
        excess: rounded_excess,
        participant_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, ValidationError};

    fn order_of(people: &[(&str, i64)]) -> OrderData {
        let mut order = OrderData::default();
        for (name, cents) in people {
            order.add_person(*name, Money::from_cents(*cents));
        }
        order
    }

    #[test]
    fn test_within_budget_nobody_pays() {
        let order = order_of(&[("Alice", 1000), ("Bob", 800)]);

        let result = calculate_proportional(&order, Money::from_major(14)).unwrap();

        assert!(result.within_budget);
        assert_eq!(result.excess, Money::zero());
        assert!(result.shares.iter().all(|s| s.payment.is_zero()));
        assert!(result.shares.iter().all(|s| !s.received_remainder));
    }

    #[test]
    fn test_excess_split_by_spend() {
        let mut order = order_of(&[("Alice", 2000), ("Bob", 1200), ("Carol", 800)]);
        order.delivery = Money::from_major(10);

        let result = calculate_proportional(&order, Money::from_major(14)).unwrap();

        assert!(!result.within_budget);
        assert_eq!(result.excess, Money::from_major(8));
        assert_eq!(result.share("Alice").unwrap().payment, Money::from_major(4));
        assert_eq!(result.share("Bob").unwrap().payment, Money::from_cents(240));
        assert_eq!(result.share("Carol").unwrap().payment, Money::from_cents(160));
    }

    #[test]
    fn test_remainder_goes_to_creator() {
        // €1 excess split three ways: 0.33 + 0.33 + 0.33, one cent left
        let mut order = order_of(&[("Alice", 1000), ("You", 1000), ("Bob", 1000)]);
        order.delivery = Money::from_major(1);

        let result = calculate_proportional(&order, Money::from_major(10)).unwrap();

        assert_eq!(result.excess, Money::from_major(1));
        assert_eq!(result.share("You").unwrap().payment, Money::from_cents(34));
        assert!(result.share("You").unwrap().received_remainder);
        assert_eq!(result.share("Alice").unwrap().payment, Money::from_cents(33));

        let total: Money = result.shares.iter().map(|s| s.payment).sum();
        assert_eq!(total, result.excess);
    }

    #[test]
    fn test_remainder_goes_to_first_without_creator() {
        let mut order = order_of(&[("Alice", 1000), ("Bob", 1000), ("Carol", 1000)]);
        order.delivery = Money::from_major(1);

        let result = calculate_proportional(&order, Money::from_major(10)).unwrap();

        assert_eq!(result.order_creator, None);
        assert_eq!(result.shares[0].payment, Money::from_cents(34));
        assert!(result.shares[0].received_remainder);
    }

    #[test]
    fn test_zero_subtotal_splits_evenly() {
        let mut order = order_of(&[("Alice", 0), ("Bob", 0)]);
        order.delivery = Money::from_major(4);

        let result = calculate_proportional(&order, Money::zero()).unwrap();

        assert_eq!(result.share("Alice").unwrap().payment, Money::from_major(2));
        assert_eq!(result.share("Bob").unwrap().payment, Money::from_major(2));
    }

    #[test]
    fn test_zero_budget_everyone_pays_their_spend_share() {
        let order = order_of(&[("Alice", 1500), ("Bob", 500)]);

        let result = calculate_proportional(&order, Money::zero()).unwrap();

        assert_eq!(result.excess, Money::from_major(20));
        assert_eq!(result.share("Alice").unwrap().payment, Money::from_major(15));
        assert_eq!(result.share("Bob").unwrap().payment, Money::from_major(5));
    }

    #[test]
    fn test_rejects_empty_order() {
        let err = calculate_proportional(&OrderData::default(), Money::from_major(14)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test]
    fn test_rejects_huge_budget_and_fees() {
        let mut order = order_of(&[("Alice", 1000), ("Bob", 500)]);

        let huge = Money::from_decimal(Decimal::from_i128_with_scale(7 * 10i128.pow(28), 0));
        let err = calculate_proportional(&order, huge).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(ValidationError::TooLarge { .. })));

        order.delivery = Money::from_decimal(Decimal::MAX);
        order.service = Money::from_cents(100);
        let err = calculate_proportional(&order, Money::from_major(14)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(ValidationError::TooLarge { .. })));
    }
}
