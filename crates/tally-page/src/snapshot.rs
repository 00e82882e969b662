//! # Page Snapshot
//!
//! What the browser side captures from the order page. Structured blocks
//! are filled in when the page markup was recognized; `text` always holds
//! the visible page text for the fallback strategy.
//!
//! ```json
//! {
//!   "participants": [
//!     { "name": "Alice", "prices": ["€ 12,50", "€ 3,00"] },
//!     { "name": "Bob (you)", "prices": ["€ 9,95"] }
//!   ],
//!   "fees": [
//!     { "label": "Bezorgkosten", "amount": "€ 2,49" },
//!     { "label": "Korting", "amount": "-€ 5,00" }
//!   ],
//!   "text": "Alice\nPizza € 12,50\n..."
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::PageResult;

/// One captured order page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSnapshot {
    /// Address of the page, for logging only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub participants: Vec<ParticipantBlock>,
    #[serde(default)]
    pub fees: Vec<FeeRow>,
    #[serde(default)]
    pub text: String,
}

/// A participant's section of the structured order markup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParticipantBlock {
    pub name: String,
    /// Raw price cells, one per ordered item.
    #[serde(default)]
    pub prices: Vec<String>,
}

/// An order-level row such as delivery or a voucher.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeeRow {
    pub label: String,
    pub amount: String,
}

impl PageSnapshot {
    /// Reads a snapshot from its JSON form.
    pub fn from_json(json: &str) -> PageResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// A snapshot with only visible text, as captured from unknown markup.
    pub fn from_text(text: impl Into<String>) -> Self {
        PageSnapshot {
            text: text.into(),
            ..Default::default()
        }
    }

    /// True when neither strategy has anything to look at.
    pub fn is_blank(&self) -> bool {
        self.participants.is_empty() && self.fees.is_empty() && self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PageError;

    #[test]
    fn test_from_json() {
        let snapshot = PageSnapshot::from_json(
            r#"{
                "participants": [{ "name": "Alice", "prices": ["€ 12,50"] }],
                "fees": [{ "label": "Delivery", "amount": "€ 2,00" }]
            }"#,
        )
        .unwrap();

        assert_eq!(snapshot.participants.len(), 1);
        assert_eq!(snapshot.participants[0].prices, vec!["€ 12,50".to_string()]);
        assert_eq!(snapshot.fees[0].label, "Delivery");
        assert!(snapshot.text.is_empty());
        assert_eq!(snapshot.url, None);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            PageSnapshot::from_json("not json"),
            Err(PageError::InvalidSnapshot(_))
        ));
    }

    #[test]
    fn test_is_blank() {
        assert!(PageSnapshot::default().is_blank());
        assert!(PageSnapshot::from_text("  \n ").is_blank());
        assert!(!PageSnapshot::from_text("Alice").is_blank());
    }
}
