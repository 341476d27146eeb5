//! Type-safe price representation using decimal arithmetic.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from price arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    /// Running total's currency, then the currency being added.
    #[error("cannot add {1:?} to {0:?}")]
    CurrencyMismatch(CurrencyCode, CurrencyCode),
    #[error("price amount overflowed")]
    Overflow,
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., reais, not centavos).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    #[serde(default)]
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// A whole-unit price in the default currency.
    #[must_use]
    pub fn whole(units: i64) -> Self {
        Self::new(Decimal::from(units), CurrencyCode::default())
    }

    /// Zero in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    /// Add two prices of the same currency.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::CurrencyMismatch` when the currencies differ and
    /// `PriceError::Overflow` if the decimal amount overflows.
    pub fn checked_add(self, other: Self) -> Result<Self, PriceError> {
        if self.currency_code != other.currency_code {
            return Err(PriceError::CurrencyMismatch(
                self.currency_code,
                other.currency_code,
            ));
        }
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or(PriceError::Overflow)?;
        Ok(Self::new(amount, self.currency_code))
    }

    /// Sum a sequence of prices, starting from zero in `currency_code`.
    ///
    /// # Errors
    ///
    /// Fails on the first price whose currency differs or on overflow.
    pub fn sum<I>(currency_code: CurrencyCode, prices: I) -> Result<Self, PriceError>
    where
        I: IntoIterator<Item = Self>,
    {
        prices
            .into_iter()
            .try_fold(Self::zero(currency_code), Self::checked_add)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:.2}", self.currency_code.symbol(), self.amount)
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    BRL,
    USD,
    EUR,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::BRL => "R$ ",
            Self::USD => "$",
            Self::EUR => "€",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_of_literal_prices() {
        let total = Price::sum(CurrencyCode::BRL, [Price::whole(100), Price::whole(250)])
            .expect("sum");
        assert_eq!(total, Price::whole(350));
    }

    #[test]
    fn test_sum_empty_is_zero() {
        let total = Price::sum(CurrencyCode::BRL, []).expect("sum");
        assert_eq!(total.amount, Decimal::ZERO);
    }

    #[test]
    fn test_sum_is_exact_for_fractions() {
        let a = Price::new(Decimal::new(10, 2), CurrencyCode::BRL);
        let b = Price::new(Decimal::new(20, 2), CurrencyCode::BRL);
        let total = a.checked_add(b).expect("add");
        assert_eq!(total.amount, Decimal::new(30, 2));
    }

    #[test]
    fn test_currency_mismatch() {
        let err = Price::whole(1)
            .checked_add(Price::new(Decimal::ONE, CurrencyCode::USD))
            .unwrap_err();
        assert_eq!(
            err,
            PriceError::CurrencyMismatch(CurrencyCode::BRL, CurrencyCode::USD)
        );
        assert_eq!(err.to_string(), "cannot add USD to BRL");
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::whole(15000).to_string(), "R$ 15000.00");
    }

    #[test]
    fn test_deserialize_amount_as_string() {
        let price: Price = serde_json::from_str(r#"{"amount":"7500"}"#).expect("deserialize");
        assert_eq!(price, Price::whole(7500));
    }
}
