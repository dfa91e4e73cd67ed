//! Product price using decimal arithmetic.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("invalid price: {0:?}")]
    Invalid(String),
}

/// A product price.
///
/// No sign or range constraint is applied: the catalog accepts any finite
/// decimal, including zero and negative values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Parse a price from form input.
    ///
    /// Accepts plain decimals (`12.50`, `-3`) and scientific notation
    /// (`1.5e2`). Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Invalid` if the input is not a finite decimal.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let trimmed = s.trim();
        Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map(Self)
            .map_err(|_| PriceError::Invalid(s.to_owned()))
    }

    /// Returns the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_decimal() {
        let price = Price::parse("12.50").unwrap();
        assert_eq!(price.amount(), Decimal::new(1250, 2));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(Price::parse(" 3 ").unwrap().amount(), Decimal::from(3));
    }

    #[test]
    fn test_parse_negative_is_allowed() {
        assert_eq!(Price::parse("-5").unwrap().amount(), Decimal::from(-5));
    }

    #[test]
    fn test_parse_scientific() {
        assert_eq!(Price::parse("1.5e2").unwrap().amount(), Decimal::from(150));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(Price::parse("cheap"), Err(PriceError::Invalid(_))));
        assert!(Price::parse("").is_err());
        assert!(Price::parse("NaN").is_err());
    }
}
