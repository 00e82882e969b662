//! # Fee Rows
//!
//! Recognizes the order-level rows printed under the participants and folds
//! them into the shared costs of an [`OrderData`].
//!
//! | Kind       | Labels (EN / NL / DE)                              | Effect            |
//! |------------|----------------------------------------------------|-------------------|
//! | `Delivery` | delivery, bezorgkosten, lieferkosten, versand      | `delivery += x`   |
//! | `Service`  | service fee, servicekosten, servicegebühr          | `service += x`    |
//! | `Discount` | discount, voucher, korting, rabatt, gutschein      | `discount -= │x│` |
//! | `AddOn`    | tip, fooi, trinkgeld, donation                     | `discount += │x│` |
//! | `Ignored`  | subtotal, total, totaal, gesamt, summe             | nothing           |
//!
//! The `discount` field is added to the shared costs, so a voucher lowers it
//! and a tip raises it, whatever sign the page printed.

use tally_core::{Money, OrderData};

/// What an order-level row does to the shared costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeKind {
    Delivery,
    Service,
    Discount,
    /// Paid extras such as a tip, shared like a negative discount.
    AddOn,
    /// Sums the page prints for convenience; recomputed by the calculator.
    Ignored,
}

/// Word prefixes per kind, checked in this order.
const KEYWORDS: [(FeeKind, &[&str]); 5] = [
    (
        FeeKind::AddOn,
        &["tip", "fooi", "trinkgeld", "donation", "donatie", "spende"],
    ),
    (
        FeeKind::Discount,
        &[
            "discount", "voucher", "coupon", "promo", "korting", "rabatt", "gutschein",
        ],
    ),
    (
        FeeKind::Delivery,
        &["delivery", "bezorg", "liefer", "versand", "shipping"],
    ),
    (FeeKind::Service, &["service", "bedien", "transaction"]),
    (
        FeeKind::Ignored,
        &[
            "subtotal", "subtotaal", "zwischensumme", "total", "totaal", "gesamt", "summe",
        ],
    ),
];

impl FeeKind {
    /// Classifies a row label, or `None` when the label is not a fee row.
    ///
    /// Matching is on word prefixes, case-insensitive, so "Bezorgkosten"
    /// and "Service fee" match but a participant called "Stipe" does not.
    pub fn classify(label: &str) -> Option<FeeKind> {
        let lower = label.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        KEYWORDS.iter().find_map(|(kind, prefixes)| {
            words
                .iter()
                .any(|word| prefixes.iter().any(|prefix| word.starts_with(prefix)))
                .then_some(*kind)
        })
    }

    /// Adds a row amount to the order's shared costs.
    pub fn apply(self, order: &mut OrderData, amount: Money) {
        match self {
            FeeKind::Delivery => order.delivery += amount,
            FeeKind::Service => order.service += amount,
            FeeKind::Discount => order.discount -= amount.abs(),
            FeeKind::AddOn => order.discount += amount.abs(),
            FeeKind::Ignored => {}
        }
    }
}
