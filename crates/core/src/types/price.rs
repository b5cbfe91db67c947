//! Type-safe price representation using decimal arithmetic.
//!
//! The catalog service reports prices as plain JSON numbers (`179.9`), and
//! cart snapshots keep that shape so they stay readable by other clients.

use std::fmt;
use std::iter::Sum;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A unit price in the store's currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Price of `quantity` units.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|p| p.0).sum())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_price_display_two_decimals() {
        assert_eq!(Price::new(Decimal::new(1799, 1)).to_string(), "$179.90");
        assert_eq!(Price::new(Decimal::from(5)).to_string(), "$5.00");
    }

    #[test]
    fn test_price_serializes_as_number() {
        let price = Price::new(Decimal::new(1399, 1));
        assert_eq!(serde_json::to_string(&price).unwrap(), "139.9");

        let parsed: Price = serde_json::from_str("139.9").unwrap();
        assert_eq!(parsed, price);

        let whole: Price = serde_json::from_str("200").unwrap();
        assert_eq!(whole, Price::new(Decimal::from(200)));
    }

    #[test]
    fn test_price_times_and_sum() {
        let price = Price::new(Decimal::new(1050, 2));
        assert_eq!(price.times(3), Price::new(Decimal::new(3150, 2)));
        assert_eq!(price.times(0), Price::ZERO);

        let total: Price = [price, price.times(2)].into_iter().sum();
        assert_eq!(total.to_string(), "$31.50");
    }
}
