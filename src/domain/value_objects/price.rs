//! # Price Value Object
//!
//! Strictly positive monetary amount backed by `rust_decimal`.
//!
//! Every negotiable amount in the engine (requested price, counter-offer,
//! final price, product price) is a [`Price`]. Construction validates
//! positivity once, so downstream code never re-checks it.
//!
//! # Examples
//!
//! ```
//! use craft_quotes::domain::value_objects::price::Price;
//! use rust_decimal::Decimal;
//!
//! let price = Price::new(Decimal::new(10000, 2)).unwrap(); // 100.00
//! assert!(price.get() > Decimal::ZERO);
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A strictly positive monetary amount.
///
/// # Invariants
///
/// - Always greater than zero
///
/// # Examples
///
/// ```
/// use craft_quotes::domain::value_objects::price::Price;
/// use rust_decimal::Decimal;
///
/// let floor = Price::new(Decimal::new(50, 0)).unwrap();
/// let offer = Price::new(Decimal::new(60, 0)).unwrap();
/// assert!(offer >= floor);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Creates a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the amount is zero or negative.
    pub fn new(amount: Decimal) -> DomainResult<Self> {
        if amount <= Decimal::ZERO {
            return Err(DomainError::Validation(format!(
                "price must be positive, got {amount}"
            )));
        }
        Ok(Self(amount))
    }

    /// Creates a price from integer major units (e.g. whole dollars).
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the amount is zero or negative.
    pub fn from_major(units: i64) -> DomainResult<Self> {
        Self::new(Decimal::new(units, 0))
    }

    /// Returns the underlying decimal amount.
    #[inline]
    #[must_use]
    pub const fn get(&self) -> Decimal {
        self.0
    }

    /// Scales the price by a ratio, e.g. `0.5` for a 50% floor.
    ///
    /// Returns `None` on arithmetic overflow.
    #[must_use]
    pub fn scale(&self, ratio: Decimal) -> Option<Decimal> {
        self.0.checked_mul(ratio)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    mod construction {
        use super::*;

        #[test]
        fn positive_amount_accepted() {
            let price = Price::new(Decimal::new(1, 2)).unwrap(); // 0.01
            assert_eq!(price.get(), Decimal::new(1, 2));
        }

        #[test]
        fn zero_rejected() {
            let result = Price::new(Decimal::ZERO);
            assert!(matches!(result, Err(DomainError::Validation(_))));
        }

        #[test]
        fn negative_rejected() {
            let result = Price::new(Decimal::new(-100, 0));
            assert!(matches!(result, Err(DomainError::Validation(_))));
        }

        #[test]
        fn from_major_units() {
            let price = Price::from_major(100).unwrap();
            assert_eq!(price.get(), Decimal::new(100, 0));
        }
    }

    mod scaling {
        use super::*;

        #[test]
        fn half_of_hundred_is_fifty() {
            let price = Price::from_major(100).unwrap();
            let half = price.scale(Decimal::new(5, 1)).unwrap();
            assert_eq!(half, Decimal::new(50, 0));
        }
    }

    mod ordering {
        use super::*;

        #[test]
        fn prices_order_by_amount() {
            let low = Price::from_major(50).unwrap();
            let high = Price::from_major(75).unwrap();
            assert!(low < high);
        }
    }

    mod serde_repr {
        use super::*;

        #[test]
        fn roundtrip() {
            let price = Price::new(Decimal::new(9999, 2)).unwrap();
            let json = serde_json::to_string(&price).unwrap();
            let back: Price = serde_json::from_str(&json).unwrap();
            assert_eq!(back, price);
        }
    }

    proptest! {
        #[test]
        fn positive_always_constructs(units in 1i64..1_000_000_000) {
            prop_assert!(Price::from_major(units).is_ok());
        }

        #[test]
        fn non_positive_never_constructs(units in -1_000_000_000i64..=0) {
            prop_assert!(Price::from_major(units).is_err());
        }
    }
}
