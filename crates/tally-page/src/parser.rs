//! # Page Parser
//!
//! Runs the extraction strategies in order and checks the result before it
//! can reach a calculator.

use tally_core::validation::validate_order_data;
use tally_core::{OrderData, MAX_INDIVIDUAL_ORDER, MAX_PARTICIPANTS};
use tracing::{debug, info, warn};

use crate::error::{PageError, PageResult};
use crate::snapshot::PageSnapshot;
use crate::strategy::{ExtractionStrategy, StructuredStrategy, TextFallbackStrategy};

/// Ordered list of extraction strategies.
///
/// ## Example
/// ```rust
/// use tally_page::{PageParser, PageSnapshot};
///
/// let snapshot = PageSnapshot::from_text("Alice\nPizza € 12,50\nBob\nPasta € 9,00");
/// let order = PageParser::default().parse(&snapshot).unwrap();
///
/// assert_eq!(order.participant_count(), 2);
/// ```
pub struct PageParser {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl Default for PageParser {
    /// Structured markup first, visible text second.
    fn default() -> Self {
        PageParser::new(vec![
            Box::new(StructuredStrategy),
            Box::new(TextFallbackStrategy),
        ])
    }
}

impl std::fmt::Debug for PageParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageParser")
            .field("strategies", &self.strategy_names())
            .finish()
    }
}

impl PageParser {
    pub fn new(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        PageParser { strategies }
    }

    /// Appends a strategy after the existing ones.
    pub fn with_strategy(mut self, strategy: impl ExtractionStrategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Extracts a validated order from the snapshot.
    ///
    /// ## Flow
    /// ```text
    /// for each strategy:
    ///     Ok(Some(order)) ──► sanity checks ──► Ok(order)
    ///     Ok(None)        ──► next strategy
    ///     Err(e)          ──► remember e, next strategy
    /// all done: first remembered error, else NoParticipants
    /// ```
    ///
    /// ## Errors
    /// - `NoParticipants` when every strategy found nothing
    /// - `MalformedPrice` when no strategy succeeded and one hit a bad price
    /// - `TooManyParticipants`, `ImplausibleAmount`, `InvalidOrder` when the
    ///   extracted order fails the sanity checks
    pub fn parse(&self, snapshot: &PageSnapshot) -> PageResult<OrderData> {
        if snapshot.is_blank() {
            debug!("Page snapshot is blank");
            return Err(PageError::NoParticipants);
        }

        let mut first_error: Option<PageError> = None;

        for strategy in &self.strategies {
            match strategy.extract(snapshot) {
                Ok(Some(order)) => {
                    info!(
                        strategy = strategy.name(),
                        participants = order.participant_count(),
                        url = snapshot.url.as_deref().unwrap_or("-"),
                        "Extracted order from page"
                    );
                    check_order(&order)?;
                    return Ok(order);
                }
                Ok(None) => {
                    debug!(strategy = strategy.name(), "No data");
                }
                Err(e) => {
                    warn!(strategy = strategy.name(), error = %e, "Extraction failed");
                    first_error.get_or_insert(e);
                }
            }
        }

        Err(first_error.unwrap_or(PageError::NoParticipants))
    }
}

/// Sanity checks with page-specific errors first, then full validation.
fn check_order(order: &OrderData) -> PageResult<()> {
    let count = order.participant_count();
    if count > MAX_PARTICIPANTS {
        return Err(PageError::TooManyParticipants {
            count,
            max: MAX_PARTICIPANTS,
        });
    }

    if let Some(person) = order.people.iter().find(|p| p.amount > MAX_INDIVIDUAL_ORDER) {
        return Err(PageError::ImplausibleAmount {
            name: person.name.clone(),
            amount: person.amount,
            max: MAX_INDIVIDUAL_ORDER,
        });
    }

    validate_order_data(order)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::ParticipantBlock;
    use tally_core::Money;

    /// Always finds the same fixed order.
    struct FixedStrategy(OrderData);

    impl ExtractionStrategy for FixedStrategy {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn extract(&self, _snapshot: &PageSnapshot) -> PageResult<Option<OrderData>> {
            Ok(Some(self.0.clone()))
        }
    }

    fn order_of(people: &[(&str, i64)]) -> OrderData {
        let mut order = OrderData::default();
        for (name, cents) in people {
            order.add_person(*name, Money::from_cents(*cents));
        }
        order
    }

    #[test]
    fn test_structured_wins_over_text() {
        let snapshot = PageSnapshot {
            participants: vec![ParticipantBlock {
                name: "Alice".into(),
                prices: vec!["€ 10,00".into()],
            }],
            text: "Bob\nPizza € 20,00".into(),
            ..Default::default()
        };

        let order = PageParser::default().parse(&snapshot).unwrap();

        assert_eq!(order.names().collect::<Vec<_>>(), vec!["Alice"]);
    }

    #[test]
    fn test_falls_back_to_text() {
        let snapshot = PageSnapshot::from_text("Bob\nPizza € 20,00");

        let order = PageParser::default().parse(&snapshot).unwrap();

        assert_eq!(order.names().collect::<Vec<_>>(), vec!["Bob"]);
    }

    #[test]
    fn test_empty_page() {
        let err = PageParser::default().parse(&PageSnapshot::default()).unwrap_err();
        assert!(matches!(err, PageError::NoParticipants));
    }

    #[test]
    fn test_blank_page_skips_strategies() {
        let parser = PageParser::new(vec![Box::new(FixedStrategy(order_of(&[("Alice", 1000)])))]);

        let err = parser.parse(&PageSnapshot::from_text("  \n ")).unwrap_err();

        assert!(matches!(err, PageError::NoParticipants));
    }

    #[test]
    fn test_error_kept_when_nothing_else_works() {
        let snapshot = PageSnapshot {
            participants: vec![ParticipantBlock {
                name: "Alice".into(),
                prices: vec!["ten".into()],
            }],
            ..Default::default()
        };

        let err = PageParser::default().parse(&snapshot).unwrap_err();
        assert!(matches!(err, PageError::MalformedPrice { .. }));
    }

    #[test]
    fn test_later_strategy_recovers_from_error() {
        let snapshot = PageSnapshot {
            participants: vec![ParticipantBlock {
                name: "Alice".into(),
                prices: vec!["ten".into()],
            }],
            text: "Alice\nPizza € 10,00".into(),
            ..Default::default()
        };

        let order = PageParser::default().parse(&snapshot).unwrap();
        assert_eq!(order.people[0].amount, Money::from_major(10));
    }

    #[test]
    fn test_too_many_participants() {
        let mut order = OrderData::default();
        for i in 0..60 {
            order.add_person(format!("Person {}", i), Money::from_major(5));
        }
        let parser = PageParser::new(vec![Box::new(FixedStrategy(order))]);

        let err = parser.parse(&PageSnapshot::from_text("group order")).unwrap_err();

        assert!(matches!(
            err,
            PageError::TooManyParticipants { count: 60, max: 50 }
        ));
    }

    #[test]
    fn test_implausible_amount() {
        let parser = PageParser::new(vec![Box::new(FixedStrategy(order_of(&[
            ("Alice", 1000),
            ("Bob", 150_000),
        ])))]);

        let err = parser.parse(&PageSnapshot::from_text("group order")).unwrap_err();

        match err {
            PageError::ImplausibleAmount { name, amount, .. } => {
                assert_eq!(name, "Bob");
                assert_eq!(amount, Money::from_major(1500));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_negative_item_total_is_invalid() {
        let parser =
            PageParser::new(vec![Box::new(FixedStrategy(order_of(&[("Alice", -100)])))]);

        let err = parser.parse(&PageSnapshot::from_text("group order")).unwrap_err();
        assert!(matches!(err, PageError::InvalidOrder(_)));
    }

    #[test]
    fn test_custom_strategy_order() {
        let parser = PageParser::new(Vec::new())
            .with_strategy(TextFallbackStrategy)
            .with_strategy(StructuredStrategy);

        assert_eq!(parser.strategy_names(), vec!["text", "structured"]);
    }
}
