//! Type-safe price representation using decimal arithmetic.
//!
//! Catalog prices and order totals are exact decimals in the currency's
//! standard unit (dollars, not cents). Payment providers charge in minor
//! units, so every conversion goes through [`Price::to_minor_units`] and the
//! same rounding rule is applied at intent creation and at verification.

use core::fmt;
use core::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors raised when converting a price.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is negative.
    #[error("price cannot be negative")]
    Negative,
    /// The amount does not fit in a signed 64-bit count of minor units.
    #[error("price is out of range")]
    OutOfRange,
    /// Unknown ISO 4217 code.
    #[error("unsupported currency: {0}")]
    UnsupportedCurrency(String),
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
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

    /// Convert to minor currency units (cents for USD).
    ///
    /// Computes `round(amount * 100)`, rounding midpoints away from zero.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] for negative amounts and
    /// [`PriceError::OutOfRange`] if the result does not fit in an `i64`.
    pub fn to_minor_units(&self) -> Result<i64, PriceError> {
        if self.amount.is_sign_negative() && !self.amount.is_zero() {
            return Err(PriceError::Negative);
        }

        self.amount
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or(PriceError::OutOfRange)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .ok_or(PriceError::OutOfRange)
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!(
            "{}{:.2}",
            self.currency_code.symbol(),
            self.amount.round_dp(2)
        )
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Uppercase ISO 4217 code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }

    /// Lowercase code, as payment providers expect it.
    #[must_use]
    pub const fn provider_code(&self) -> &'static str {
        match self {
            Self::USD => "usd",
            Self::EUR => "eur",
            Self::GBP => "gbp",
            Self::CAD => "cad",
            Self::AUD => "aud",
        }
    }

    /// Display symbol.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }
}

impl FromStr for CurrencyCode {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "CAD" => Ok(Self::CAD),
            "AUD" => Ok(Self::AUD),
            other => Err(PriceError::UnsupportedCurrency(other.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn usd(s: &str) -> Price {
        Price::new(s.parse().unwrap(), CurrencyCode::USD)
    }

    #[test]
    fn test_minor_units_exact() {
        assert_eq!(usd("15.00").to_minor_units(), Ok(1500));
        assert_eq!(usd("24.99").to_minor_units(), Ok(2499));
        assert_eq!(usd("0").to_minor_units(), Ok(0));
    }

    #[test]
    fn test_minor_units_rounds_midpoint_away_from_zero() {
        assert_eq!(usd("0.005").to_minor_units(), Ok(1));
        assert_eq!(usd("10.125").to_minor_units(), Ok(1013));
        assert_eq!(usd("10.124").to_minor_units(), Ok(1012));
    }

    #[test]
    fn test_minor_units_rejects_negative() {
        assert_eq!(usd("-1.00").to_minor_units(), Err(PriceError::Negative));
    }

    #[test]
    fn test_minor_units_out_of_range() {
        let price = Price::new(Decimal::MAX, CurrencyCode::USD);
        assert_eq!(price.to_minor_units(), Err(PriceError::OutOfRange));
    }

    #[test]
    fn test_display() {
        assert_eq!(usd("8.9").display(), "$8.90");
        assert_eq!(
            Price::new("12.5".parse().unwrap(), CurrencyCode::GBP).to_string(),
            "£12.50"
        );
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!("usd".parse::<CurrencyCode>().unwrap(), CurrencyCode::USD);
        assert_eq!(" EUR ".parse::<CurrencyCode>().unwrap(), CurrencyCode::EUR);
        assert!(matches!(
            "JPY".parse::<CurrencyCode>(),
            Err(PriceError::UnsupportedCurrency(_))
        ));
    }

    #[test]
    fn test_provider_code_is_lowercase() {
        assert_eq!(CurrencyCode::USD.provider_code(), "usd");
        assert_eq!(CurrencyCode::AUD.code(), "AUD");
    }
}
