//! # Extraction Strategies
//!
//! Order page markup changes without notice, so extraction is a list of
//! independent strategies tried in order. Each one either builds an
//! [`OrderData`] or says explicitly that it found nothing.
//!
//! ```text
//! ┌─────────────────────┐   Ok(None)   ┌─────────────────────┐   Ok(None)
//! │ StructuredStrategy  │ ───────────► │ TextFallbackStrategy│ ───────────► NoParticipants
//! │ participant blocks  │              │ visible page text   │
//! └─────────┬───────────┘              └─────────┬───────────┘
//!           │ Ok(Some(order))                    │ Ok(Some(order))
//!           ▼                                    ▼
//!                          OrderData
//! ```

use tally_core::{Money, OrderData};
use tracing::{debug, warn};

use crate::error::PageResult;
use crate::fees::FeeKind;
use crate::price::{parse_price, split_trailing_price};
use crate::snapshot::PageSnapshot;

/// One way of reading an order out of a page snapshot.
pub trait ExtractionStrategy: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Builds the order, or returns `Ok(None)` when this strategy finds no
    /// participants in the snapshot.
    fn extract(&self, snapshot: &PageSnapshot) -> PageResult<Option<OrderData>>;
}

// =============================================================================
// Order Builder
// =============================================================================

/// Accumulates participants in page order, summing repeated names.
#[derive(Debug, Default)]
struct OrderBuilder {
    order: OrderData,
}

impl OrderBuilder {
    fn add_item(&mut self, name: &str, amount: Money) {
        let name = name.trim();

        match self.order.people.iter_mut().find(|p| p.name == name) {
            Some(person) => person.amount += amount,
            None => {
                self.order.add_person(name, amount);
            }
        }
    }

    fn add_fee(&mut self, label: &str, kind: FeeKind, amount: Money) {
        debug!(label, ?kind, %amount, "Fee row");
        kind.apply(&mut self.order, amount);
    }

    fn finish(self) -> Option<OrderData> {
        if self.order.is_empty() {
            None
        } else {
            Some(self.order)
        }
    }
}

// =============================================================================
// Structured Strategy
// =============================================================================

/// Reads the participant blocks captured from recognized order markup.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredStrategy;

impl ExtractionStrategy for StructuredStrategy {
    fn name(&self) -> &'static str {
        "structured"
    }

    fn extract(&self, snapshot: &PageSnapshot) -> PageResult<Option<OrderData>> {
        let mut builder = OrderBuilder::default();

        for block in &snapshot.participants {
            if block.name.trim().is_empty() {
                debug!(prices = block.prices.len(), "Skipping block without a name");
                continue;
            }

            let mut amount = Money::zero();
            for price in &block.prices {
                amount += parse_price(price)?;
            }
            builder.add_item(&block.name, amount);
        }

        if builder.order.is_empty() {
            return Ok(None);
        }

        for row in &snapshot.fees {
            match FeeKind::classify(&row.label) {
                Some(kind) => builder.add_fee(&row.label, kind, parse_price(&row.amount)?),
                None => warn!(label = %row.label, "Unrecognized fee row ignored"),
            }
        }

        Ok(builder.finish())
    }
}

// =============================================================================
// Text Fallback Strategy
// =============================================================================

/// Reads the visible page text line by line.
///
/// ## Layout assumed
/// ```text
/// Alice                       ◄── line without a price: candidate name
/// 1x Pizza Margherita € 12,50 ◄── priced line: item of the candidate
/// 1x Cola € 2,50
/// Bob (you)
/// Salad 8,95 €
/// Delivery € 2,49             ◄── priced line with a fee label
/// Total € 26,44               ◄── printed sums are ignored
/// ```
/// A candidate name only becomes a participant once an item follows it,
/// so headings and stray labels never end up in the order.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextFallbackStrategy;

impl ExtractionStrategy for TextFallbackStrategy {
    fn name(&self) -> &'static str {
        "text"
    }

    fn extract(&self, snapshot: &PageSnapshot) -> PageResult<Option<OrderData>> {
        let mut builder = OrderBuilder::default();
        let mut current: Option<&str> = None;

        for line in snapshot.text.lines().map(str::trim) {
            if line.is_empty() {
                continue;
            }

            match split_trailing_price(line)? {
                Some((label, amount)) => {
                    if let Some(kind) = FeeKind::classify(label) {
                        builder.add_fee(label, kind, amount);
                        current = None;
                    } else if let Some(name) = current {
                        builder.add_item(name, amount);
                    } else {
                        debug!(line, "Priced line before any name");
                    }
                }
                None => {
                    if FeeKind::classify(line).is_none() {
                        current = Some(line);
                    }
                }
            }
        }

        Ok(builder.finish())
    }
}
