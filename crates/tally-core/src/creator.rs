//! # Order Creator Detection
//!
//! The order page labels the person who placed the order with a marker such
//! as "(you)" next to their name. Shortfall payments are owed to them.

use crate::CREATOR_MARKERS;

/// Returns the first participant whose name contains a creator marker.
///
/// ## Rules
/// - Case-insensitive substring match on `you`, `yu`, `me`, `myself`
/// - First match in enumeration order wins, so at most one creator
/// - No match is a valid outcome
///
/// ## Example
/// ```rust
/// use tally_core::detect_order_creator;
///
/// assert_eq!(detect_order_creator(["Bob", "You", "Carol"]), Some("You".to_string()));
/// assert_eq!(detect_order_creator(["Alice", "Bob"]), None);
/// ```
pub fn detect_order_creator<'a, I>(names: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .find(|name| is_creator_name(name))
        .map(str::to_string)
}

/// Checks a single name against the creator markers.
pub fn is_creator_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    CREATOR_MARKERS.iter().any(|marker| lower.contains(marker))
}
