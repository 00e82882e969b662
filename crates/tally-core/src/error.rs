//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  ├── CoreError        - Calculation failures                           │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  tally-page errors (separate crate)                                    │
//! │  └── PageError        - Snapshot parsing failures                      │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── AppError         - What the user sees                             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → AppError → Terminal               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Division by a zero participant count or a zero total shortfall is not an
//! error: both are guarded as policy branches inside the calculators.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Calculation errors surfaced to the caller.
///
/// The calculators never retry and hold no state, so every variant is
/// recoverable by calling again with fresh input.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Order data or budget failed validation before any math ran.
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// A calculation was requested while another one was still running.
    ///
    /// ## When This Occurs
    /// ```text
    /// page load timer fires ──► calculate() ──┐
    ///                                          │ in flight
    /// user clicks "recalculate" ──► calculate() ──► CalculationInProgress
    /// ```
    /// The request is rejected, never queued.
    #[error("Calculation already in progress")]
    CalculationInProgress,
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Produced by [`crate::validation`] when order data or settings violate the
/// sanity bounds. Used for early rejection before business logic runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative, got {value}")]
    Negative { field: String, value: String },

    /// Amount is above the plausibility ceiling.
    #[error("{field} of {value} exceeds the maximum of {max}")]
    TooLarge {
        field: String,
        value: String,
        max: String,
    },

    /// Collection holds more entries than allowed.
    #[error("{field} cannot have more than {max} entries, got {count}")]
    TooMany {
        field: String,
        max: usize,
        count: usize,
    },

    /// Duplicate value (e.g., the same participant listed twice).
    #[error("{field} '{value}' appears more than once")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
