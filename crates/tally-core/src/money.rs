//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE SHARED COST PROBLEM                                                │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  In integer cents, delivery €10.00 shared by 3:                         │
//! │    1000 / 3 = 333 cents each, 1 cent silently gone before the          │
//! │    budget math even starts                                              │
//! │                                                                         │
//! │  OUR SOLUTION: exact decimal, rounded only when reported                │
//! │    10 / 3 = 3.3333333333333333333333333333                              │
//! │    every participant keeps the full share until the report rounds it   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::money::Money;
//!
//! let price = Money::from_cents(1099); // €10.99
//!
//! let total = price + Money::from_cents(500); // €15.99
//! let share = Money::from_major(10).divide(3); // €3.333…, unrounded
//!
//! assert_eq!(total.cents(), Some(1599));
//! assert_eq!(share.round_cents(), Money::from_cents(333));
//! ```

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::error::ValidationError;

/// Decimal places kept when a figure is reported.
const CURRENCY_DECIMALS: u32 = 2;

/// Builds a decimal from an integer mantissa and scale in const context.
const fn scaled(value: i64, scale: u32) -> Decimal {
    let magnitude = value.unsigned_abs();
    Decimal::from_parts(
        (magnitude & 0xFFFF_FFFF) as u32,
        (magnitude >> 32) as u32,
        0,
        value < 0,
        scale,
    )
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in euros.
///
/// ## Design Decisions
/// - **Decimal (signed)**: negative values carry discounts and adjustments
/// - **Single field tuple struct**: zero-cost wrapper over `Decimal`
/// - **Serde**: serialized as a plain JSON number for the extension UI
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  "€ 12,50" on page ──► parse_price ──► PersonOrder.amount              │
/// │                                              │                          │
/// │  delivery + service + discount ──► divide(n) ┴──► total_cost (exact)   │
/// │                                                        │                │
/// │  ParticipantDetail fields ◄── round_cents() ◄──────────┘                │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(#[ts(type = "number")] Decimal);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // €10.99
    /// assert_eq!(price.cents(), Some(1099));
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(scaled(cents, CURRENCY_DECIMALS))
    }

    /// Creates a Money value from whole euros.
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(scaled(major, 0))
    }

    /// Wraps an exact decimal amount.
    #[inline]
    pub const fn from_decimal(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Converts a floating point amount coming from outside the crate
    /// (settings file, JSON bridge).
    ///
    /// ## Errors
    /// `ValidationError::NotFinite` for NaN, ±Infinity, or values a decimal
    /// cannot hold.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// assert_eq!(Money::try_from_f64(12.5, "budget").unwrap(), Money::from_cents(1250));
    /// assert!(Money::try_from_f64(f64::NAN, "budget").is_err());
    /// ```
    pub fn try_from_f64(value: f64, field: &str) -> Result<Self, ValidationError> {
        let not_finite = || ValidationError::NotFinite {
            field: field.to_string(),
        };

        if !value.is_finite() {
            return Err(not_finite());
        }

        Decimal::from_f64(value).map(Money).ok_or_else(not_finite)
    }

    /// Returns the exact, unrounded amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns the amount rounded to cents as an integer, or `None` when it
    /// does not fit in an `i64`.
    pub fn cents(&self) -> Option<i64> {
        self.round_cents()
            .0
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|cents| cents.to_i64())
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns the absolute value.
    #[inline]
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Negative amounts become zero, everything else is unchanged.
    #[inline]
    pub fn clamp_non_negative(self) -> Self {
        self.max(Money::zero())
    }

    /// Rounds to cents using standard currency rounding (half away from zero).
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let half_cent = Money::from_decimal(Decimal::new(10005, 3)); // 10.005
    /// assert_eq!(half_cent.round_cents(), Money::from_cents(1001));
    /// ```
    ///
    /// Only call this at the report boundary. Rounding intermediate values
    /// compounds the error once per participant.
    pub fn round_cents(&self) -> Self {
        Money(
            self.0
                .round_dp_with_strategy(CURRENCY_DECIMALS, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Splits the amount into `parts` equal, unrounded shares.
    ///
    /// A zero divisor yields zero; callers validate participant counts
    /// before dividing.
    pub fn divide(&self, parts: usize) -> Self {
        if parts == 0 {
            return Money::zero();
        }
        Money(self.0 / Decimal::from(parts))
    }

    /// Multiplies by a ratio without rounding.
    #[inline]
    pub fn scale(&self, ratio: Decimal) -> Self {
        Money(self.0 * ratio)
    }

    /// Returns `self / whole`, or zero when `whole` is zero.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let part = Money::from_major(6);
    /// assert_eq!(part.ratio_of(Money::from_major(12)), Decimal::new(5, 1));
    /// assert_eq!(part.ratio_of(Money::zero()), Decimal::ZERO);
    /// ```
    pub fn ratio_of(&self, whole: Money) -> Decimal {
        if whole.is_zero() {
            return Decimal::ZERO;
        }
        self.0 / whole.0
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows the rounded amount, e.g. `€12.50` or `-€1.00`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.round_cents();
        let sign = if rounded.is_negative() { "-" } else { "" };
        write!(f, "{}€{:.2}", sign, rounded.0.abs())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), Some(1099));
        assert_eq!(money.amount(), Decimal::new(1099, 2));

        let negative = Money::from_cents(-550);
        assert_eq!(negative.cents(), Some(-550));
        assert!(negative.is_negative());
    }

    #[test]
    fn test_cents_overflow_is_none() {
        assert_eq!(Money::from_decimal(Decimal::MAX).cents(), None);
        assert_eq!(Money::from_major(i64::MAX / 100).cents(), Some(i64::MAX / 100 * 100));
    }

    #[test]
    fn test_from_major_equals_cents() {
        assert_eq!(Money::from_major(14), Money::from_cents(1400));
        assert_eq!(Money::from_major(-3), Money::from_cents(-300));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "€10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "€5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-€5.50");
        assert_eq!(format!("{}", Money::zero()), "€0.00");
        assert_eq!(format!("{}", Money::from_major(10).divide(3)), "€3.33");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), Some(1500));
        assert_eq!((a - b).cents(), Some(500));
        assert_eq!((-a).cents(), Some(-1000));

        let total: Money = [a, b, b].iter().sum();
        assert_eq!(total, Money::from_cents(2000));
    }

    #[test]
    fn test_round_cents_half_away_from_zero() {
        assert_eq!(
            Money::from_decimal(Decimal::new(12345, 3)).round_cents(),
            Money::from_cents(1235)
        );
        assert_eq!(
            Money::from_decimal(Decimal::new(-12345, 3)).round_cents(),
            Money::from_cents(-1235)
        );
        assert_eq!(
            Money::from_decimal(Decimal::new(12344, 3)).round_cents(),
            Money::from_cents(1234)
        );
    }

    #[test]
    fn test_try_from_f64() {
        assert_eq!(
            Money::try_from_f64(14.0, "budget").unwrap(),
            Money::from_major(14)
        );
        assert_eq!(
            Money::try_from_f64(0.1 + 0.2, "budget").unwrap().round_cents(),
            Money::from_cents(30)
        );

        let err = Money::try_from_f64(f64::INFINITY, "budget").unwrap_err();
        assert_eq!(
            err,
            ValidationError::NotFinite {
                field: "budget".to_string()
            }
        );
        assert!(Money::try_from_f64(f64::NAN, "budget").is_err());
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        assert_eq!(Money::from_cents(-1).clamp_non_negative(), Money::zero());
        assert_eq!(Money::from_cents(1).clamp_non_negative(), Money::from_cents(1));
    }

    #[test]
    fn test_divide_by_zero_is_guarded() {
        assert_eq!(Money::from_major(10).divide(0), Money::zero());
    }

    /// €10.00 split three ways keeps its precision until reporting, so the
    /// three shares still add back up to €10.00.
    #[test]
    fn test_division_keeps_precision_until_rounding() {
        let ten = Money::from_major(10);
        let third = ten.divide(3);

        let reconstructed = third + third + third;
        assert_eq!(reconstructed.round_cents(), ten);

        // Rounding first would lose a cent
        let rounded_first = third.round_cents() + third.round_cents() + third.round_cents();
        assert_eq!(rounded_first, Money::from_cents(999));
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_string(&Money::from_cents(1250)).unwrap();
        assert_eq!(json, "12.5");

        let parsed: Money = serde_json::from_str("14").unwrap();
        assert_eq!(parsed, Money::from_major(14));
    }
}
