//! # Settlement
//!
//! Turns a calculation result into the transfers owed to the order creator,
//! the person who paid the restaurant up front.
//!
//! ```text
//!   Alice pays €4.00 ──┐
//!                      ├──► You (order creator)
//!   Bob   pays €2.00 ──┘
//! ```
//! Without a detected creator nobody knows whom to pay, so no transfers
//! are produced.

use crate::types::{DistributionResult, ProportionalResult, Transfer};

/// Transfers for a budget sharing result.
///
/// Every participant other than the creator with a positive
/// `final_payment` owes that amount to the creator.
pub fn settlement_transfers(result: &DistributionResult) -> Vec<Transfer> {
    let Some(creator) = result.order_creator.as_deref() else {
        return Vec::new();
    };

    result
        .participants
        .iter()
        .filter(|p| !p.is_order_creator && p.final_payment.is_positive())
        .map(|p| Transfer {
            from: p.name.clone(),
            to: creator.to_string(),
            amount: p.final_payment,
        })
        .collect()
}

/// Transfers for a proportional result.
pub fn proportional_transfers(result: &ProportionalResult) -> Vec<Transfer> {
    let Some(creator) = result.order_creator.as_deref() else {
        return Vec::new();
    };

    result
        .shares
        .iter()
        .filter(|s| !s.is_order_creator && s.payment.is_positive())
        .map(|s| Transfer {
            from: s.name.clone(),
            to: creator.to_string(),
            amount: s.payment,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{calculate_distribution, calculate_proportional, Money, OrderData};

    fn order_of(people: &[(&str, i64)]) -> OrderData {
        let mut order = OrderData::default();
        for (name, cents) in people {
            order.add_person(*name, Money::from_cents(*cents));
        }
        order
    }

    #[test]
    fn test_debtors_pay_creator() {
        let order = order_of(&[("Alice", 2400), ("Bob", 1900), ("Carol (you)", 500)]);
        let result = calculate_distribution(&order, Money::from_major(14)).unwrap();

        let transfers = settlement_transfers(&result);

        assert_eq!(
            transfers,
            vec![
                Transfer {
                    from: "Alice".to_string(),
                    to: "Carol (you)".to_string(),
                    amount: Money::from_major(4),
                },
                Transfer {
                    from: "Bob".to_string(),
                    to: "Carol (you)".to_string(),
                    amount: Money::from_major(2),
                },
            ]
        );
    }

    #[test]
    fn test_creator_never_pays_self() {
        let order = order_of(&[("You", 3000), ("Bob", 2000)]);
        let result = calculate_distribution(&order, Money::from_major(14)).unwrap();

        let transfers = settlement_transfers(&result);

        assert_eq!(transfers.len(), 1);
        assert_eq!(transfers[0].from, "Bob");
        assert_eq!(transfers[0].amount, Money::from_major(6));
    }

    #[test]
    fn test_no_creator_no_transfers() {
        let order = order_of(&[("Alice", 3000), ("Bob", 2000)]);
        let result = calculate_distribution(&order, Money::from_major(14)).unwrap();

        assert!(settlement_transfers(&result).is_empty());
    }

    #[test]
    fn test_proportional_transfers() {
        let order = order_of(&[("Alice", 1500), ("You", 500)]);
        let result = calculate_proportional(&order, Money::zero()).unwrap();

        let transfers = proportional_transfers(&result);

        assert_eq!(transfers.len(), 1);
        assert_eq!(transfers[0].from, "Alice");
        assert_eq!(transfers[0].to, "You");
        assert_eq!(transfers[0].amount, Money::from_major(15));
    }
}
