//! # Validation Module
//!
//! Input validation for order data and settings.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Page Parser (tally-page)                                     │
//! │  ├── Price text format                                                 │
//! │  └── Maps failures below to descriptive PageErrors                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Calculators (this crate)                                     │
//! │  └── THIS MODULE: sanity bounds, run before any distribution math      │
//! │                                                                         │
//! │  Invalid input is rejected, never coerced.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::money::Money;
//! use tally_core::validation::{validate_order_amount, validate_participant_name};
//!
//! assert!(validate_participant_name("Alice").is_ok());
//! assert!(validate_order_amount("Alice", Money::from_cents(1250)).is_ok());
//! assert!(validate_order_amount("Alice", Money::from_major(5000)).is_err());
//! ```

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::OrderData;
use crate::{MAX_DAILY_BUDGET, MAX_INDIVIDUAL_ORDER, MAX_PARTICIPANTS, MAX_SHARED_COST};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest participant name accepted.
const MAX_NAME_LEN: usize = 100;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a participant name.
///
/// ## Rules
/// - Must not be empty or whitespace only
/// - At most 100 characters
pub fn validate_participant_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "participant name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "participant name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Amount Validators
// =============================================================================

/// Validates one participant's order subtotal.
///
/// ## Rules
/// - Must be non-negative (zero is allowed, e.g. a free item)
/// - Must not exceed [`MAX_INDIVIDUAL_ORDER`] (€1000)
pub fn validate_order_amount(name: &str, amount: Money) -> ValidationResult<()> {
    let field = format!("{}'s order", name);

    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field,
            value: amount.to_string(),
        });
    }

    if amount > MAX_INDIVIDUAL_ORDER {
        return Err(ValidationError::TooLarge {
            field,
            value: amount.to_string(),
            max: MAX_INDIVIDUAL_ORDER.to_string(),
        });
    }

    Ok(())
}

/// Validates a shared fee (delivery or service).
///
/// ## Rules
/// - Must be non-negative
/// - Must not exceed [`MAX_SHARED_COST`]
pub fn validate_fee(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
            value: amount.to_string(),
        });
    }

    if amount > MAX_SHARED_COST {
        return Err(ValidationError::TooLarge {
            field: field.to_string(),
            value: amount.to_string(),
            max: MAX_SHARED_COST.to_string(),
        });
    }

    Ok(())
}

/// Validates the signed discount adjustment.
///
/// ## Rules
/// - Either sign is fine
/// - Its magnitude may not exceed the plausible total of a full order
pub fn validate_discount(amount: Money) -> ValidationResult<()> {
    if amount.abs() > MAX_SHARED_COST {
        return Err(ValidationError::TooLarge {
            field: "discount".to_string(),
            value: amount.to_string(),
            max: MAX_SHARED_COST.to_string(),
        });
    }

    Ok(())
}

/// Validates a per-person budget.
///
/// ## Rules
/// - Must be non-negative; zero means "no company budget"
/// - Must not exceed [`MAX_DAILY_BUDGET`]
pub fn validate_budget(budget: Money) -> ValidationResult<()> {
    if budget.is_negative() {
        return Err(ValidationError::Negative {
            field: "budget".to_string(),
            value: budget.to_string(),
        });
    }

    if budget > MAX_DAILY_BUDGET {
        return Err(ValidationError::TooLarge {
            field: "budget".to_string(),
            value: budget.to_string(),
            max: MAX_DAILY_BUDGET.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates the number of participants.
///
/// ## Rules
/// - At least one participant
/// - At most [`MAX_PARTICIPANTS`] (50)
pub fn validate_participant_count(count: usize) -> ValidationResult<()> {
    if count == 0 {
        return Err(ValidationError::Required {
            field: "participants".to_string(),
        });
    }

    if count > MAX_PARTICIPANTS {
        return Err(ValidationError::TooMany {
            field: "participants".to_string(),
            max: MAX_PARTICIPANTS,
            count,
        });
    }

    Ok(())
}

/// Validates a complete order before it reaches a calculator.
///
/// ## Flow
/// ```text
/// participant count ──► each name ──► duplicate names ──► each amount
///                                                              │
///                           discount ◄── delivery, service ◄────┘
/// ```
/// The first violation wins.
pub fn validate_order_data(order: &OrderData) -> ValidationResult<()> {
    validate_participant_count(order.participant_count())?;

    let mut seen = HashSet::with_capacity(order.participant_count());
    for person in &order.people {
        validate_participant_name(&person.name)?;

        if !seen.insert(person.name.trim()) {
            return Err(ValidationError::Duplicate {
                field: "participant".to_string(),
                value: person.name.clone(),
            });
        }

        validate_order_amount(&person.name, person.amount)?;
    }

    validate_fee("delivery", order.delivery)?;
    validate_fee("service", order.service)?;
    validate_discount(order.discount)?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
