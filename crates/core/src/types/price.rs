//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are never floats. All money math goes through [`rust_decimal`]
//! and discount results are rounded to currency precision (2 decimal
//! places) at the boundary.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Default tax rate applied by [`Price::taxed`] (17% VAT).
pub const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(17, 0, 0, false, 2);

/// Errors produced by price construction and arithmetic.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// Price must be strictly positive.
    #[error("price must be a positive value")]
    NotPositive,
    /// Discount percentage outside the allowed range.
    #[error("discount percentage must be between 0 and 100")]
    InvalidPercentage,
}

/// A strictly positive amount of money in the store currency.
///
/// The invariant (> 0) is enforced at construction; a deserialized or
/// computed zero/negative amount is rejected the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::NotPositive`] for zero or negative amounts.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount <= Decimal::ZERO {
            return Err(PriceError::NotPositive);
        }
        Ok(Self(amount))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The amount after applying a percentage discount, rounded to
    /// 2 decimal places.
    ///
    /// A 100% discount yields zero, which is a valid *amount* but not a
    /// valid [`Price`]; callers decide whether to keep the old price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::InvalidPercentage`] if `pct` is outside
    /// `[0, 100]`.
    pub fn discounted(&self, pct: Decimal) -> Result<Decimal, PriceError> {
        calc_discount(self.0, pct)
    }

    /// The price with tax added at the given rate (e.g. `0.17` for 17%).
    #[must_use]
    pub fn with_tax(&self, rate: Decimal) -> Self {
        Self(self.0 + self.0 * rate)
    }

    /// The price with the default tax rate applied.
    #[must_use]
    pub fn taxed(&self) -> Self {
        self.with_tax(DEFAULT_TAX_RATE)
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

/// Apply a percentage discount to an amount, rounded to 2 decimal places.
///
/// Shared by item-level and cart-level discounting so both round the same
/// way (midpoint away from zero).
///
/// # Errors
///
/// Returns [`PriceError::InvalidPercentage`] if `pct` is outside `[0, 100]`.
pub fn calc_discount(amount: Decimal, pct: Decimal) -> Result<Decimal, PriceError> {
    if pct < Decimal::ZERO || pct > Decimal::ONE_HUNDRED {
        return Err(PriceError::InvalidPercentage);
    }
    let factor = Decimal::ONE - pct / Decimal::ONE_HUNDRED;
    Ok((amount * factor).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}
