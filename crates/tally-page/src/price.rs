//! # Price Parsing
//!
//! Order pages print euro amounts in whatever locale the visitor uses. All
//! of these are the same kind of value:
//!
//! ```text
//!   € 12,50     €12.50     12,50 €     1.234,56     -€ 2,00     − € 2,00
//! ```
//!
//! A 1–2 digit group after the last `,` or `.` is cents; 3 digit groups are
//! thousands. Anything else is a [`PageError::MalformedPrice`].

use std::sync::OnceLock;

use regex::{Captures, Regex};
use tally_core::Money;

use crate::error::{PageError, PageResult};

/// Cell texts that mean a zero price.
const FREE_WORDS: [&str; 3] = ["free", "gratis", "kostenlos"];

fn price_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^(?P<sign>[-−–])?\s*€?\s*(?P<sign2>[-−–])?\s*(?P<major>\d{1,3}(?:[.,\s]\d{3})+|\d+)(?:[,.](?P<minor>\d{1,2}))?\s*€?$",
        )
        .expect("price pattern is valid")
    })
}

fn trailing_price_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?P<price>[-−–]?\s*€\s*[-−–]?\s*[\d.,]+|[-−–]?\s*[\d.,]+\s*€)\s*$")
            .expect("trailing price pattern is valid")
    })
}

fn malformed(text: &str) -> PageError {
    PageError::MalformedPrice {
        text: text.to_string(),
    }
}

/// Parses one price cell into [`Money`].
///
/// ## Example
/// ```rust
/// use tally_core::Money;
/// use tally_page::parse_price;
///
/// assert_eq!(parse_price("€ 12,50").unwrap(), Money::from_cents(1250));
/// assert_eq!(parse_price("-€ 2,00").unwrap(), Money::from_cents(-200));
/// assert!(parse_price("twelve").is_err());
/// ```
pub fn parse_price(text: &str) -> PageResult<Money> {
    let trimmed = text.trim();

    if FREE_WORDS
        .iter()
        .any(|word| trimmed.eq_ignore_ascii_case(word))
    {
        return Ok(Money::zero());
    }

    let caps = price_pattern()
        .captures(trimmed)
        .ok_or_else(|| malformed(text))?;

    let cents = cents_from(&caps).ok_or_else(|| malformed(text))?;
    let negative = caps.name("sign").is_some() || caps.name("sign2").is_some();

    Ok(Money::from_cents(if negative { -cents } else { cents }))
}

fn cents_from(caps: &Captures<'_>) -> Option<i64> {
    let major: String = caps["major"]
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    let major: i64 = major.parse().ok()?;

    let minor = match caps.name("minor").map(|m| m.as_str()) {
        Some(digits) if digits.len() == 1 => digits.parse::<i64>().ok()? * 10,
        Some(digits) => digits.parse::<i64>().ok()?,
        None => 0,
    };

    major.checked_mul(100)?.checked_add(minor)
}

/// Splits a line of page text into its label and a trailing euro price.
///
/// Only amounts with a `€` sign count, so quantities like `2x` or house
/// numbers never look like prices. Returns `Ok(None)` for lines without a
/// price, and an error when the trailing amount is there but unreadable.
pub fn split_trailing_price(line: &str) -> PageResult<Option<(&str, Money)>> {
    let Some(caps) = trailing_price_pattern().captures(line) else {
        return Ok(None);
    };
    let Some(price) = caps.name("price") else {
        return Ok(None);
    };

    let amount = parse_price(price.as_str())?;
    let label = line[..price.start()].trim();

    Ok(Some((label, amount)))
}
