//! # Page Error Types
//!
//! Every way a page can fail to produce a usable order. The calculators are
//! never invoked when one of these is returned.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Page Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │    Snapshot     │  │   Extraction    │  │     Sanity              │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidSnapshot│  │  NoParticipants │  │  TooManyParticipants    │ │
//! │  │                 │  │  MalformedPrice │  │  ImplausibleAmount      │ │
//! │  │                 │  │                 │  │  InvalidOrder           │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tally_core::{Money, ValidationError};
use thiserror::Error;

/// Result type alias for page parsing.
pub type PageResult<T> = Result<T, PageError>;

/// Page parsing failure.
#[derive(Debug, Error)]
pub enum PageError {
    /// The snapshot could not be read.
    #[error("Invalid page snapshot: {0}")]
    InvalidSnapshot(String),

    /// No strategy found any participant on the page.
    #[error("No participants found on the page")]
    NoParticipants,

    /// A price cell did not look like a euro amount.
    #[error("Malformed price: '{text}'")]
    MalformedPrice { text: String },

    /// More participants than any real group order has.
    #[error("Found {count} participants, at most {max} are supported")]
    TooManyParticipants { count: usize, max: usize },

    /// A single participant's order is larger than any real lunch order.
    #[error("Implausible amount for {name}: {amount} exceeds {max}")]
    ImplausibleAmount { name: String, amount: Money, max: Money },

    /// Anything else the order validator rejected.
    #[error("Invalid order on page: {0}")]
    InvalidOrder(#[from] ValidationError),
}

impl From<serde_json::Error> for PageError {
    fn from(err: serde_json::Error) -> Self {
        PageError::InvalidSnapshot(err.to_string())
    }
}

impl PageError {
    /// True when the page itself looked wrong, as opposed to the page being
    /// empty. Callers can retry empty pages once more content has loaded.
    pub fn is_malformed(&self) -> bool {
        !matches!(self, PageError::NoParticipants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PageError::ImplausibleAmount {
            name: "Bob".into(),
            amount: Money::from_major(1500),
            max: Money::from_major(1000),
        };
        assert_eq!(
            err.to_string(),
            "Implausible amount for Bob: €1500.00 exceeds €1000.00"
        );

        let err = PageError::MalformedPrice { text: "12 euro".into() };
        assert_eq!(err.to_string(), "Malformed price: '12 euro'");
    }

    #[test]
    fn test_is_malformed() {
        assert!(!PageError::NoParticipants.is_malformed());
        assert!(PageError::TooManyParticipants { count: 80, max: 50 }.is_malformed());
    }

    #[test]
    fn test_from_json_error() {
        let err: PageError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, PageError::InvalidSnapshot(_)));
    }
}
