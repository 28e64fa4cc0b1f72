//! Monetary values.
//!
//! Prices are stored as an integer count of minor currency units and only
//! viewed as decimals at the edges. The type validates as a unit but
//! reports one message per failed sub-check, so an absent amount surfaces
//! both as non-numeric and as blank.

use std::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoneyError {
    #[error("amount is not a number")]
    NotANumber,
    #[error("amount is finer than one cent")]
    Precision,
    #[error("amount does not fit in minor units")]
    OutOfRange,
}

/// ISO 4217 currency codes accepted by the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
}

impl Currency {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::USD | Self::CAD => "$",
            Self::EUR => "\u{20ac}",
            Self::GBP => "\u{a3}",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
        }
    }
}

/// An amount of money: minor units plus a currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub cents: i64,
    pub currency: Currency,
}

impl Money {
    pub fn new(cents: i64, currency: Currency) -> Self {
        Self { cents, currency }
    }

    pub fn from_cents(cents: i64) -> Self {
        Self::new(cents, Currency::default())
    }

    /// The decimal view of the stored minor units: 6499 -> 64.99.
    pub fn amount(self) -> Decimal {
        Decimal::new(self.cents, 2)
    }

    /// Parse a decimal amount (`"64.99"`) into minor units.
    pub fn parse(input: &str) -> Result<Self, MoneyError> {
        let amount: Decimal = input.trim().parse().map_err(|_| MoneyError::NotANumber)?;
        let scaled = amount * Decimal::ONE_HUNDRED;
        if scaled.fract() != Decimal::ZERO {
            return Err(MoneyError::Precision);
        }
        let cents = scaled.to_i64().ok_or(MoneyError::OutOfRange)?;
        Ok(Self::from_cents(cents))
    }

    /// Sub-checks for a monetary field, one message per underlying
    /// component check. An absent amount fails the numeric check and the
    /// blank check.
    pub(crate) fn amount_checks(value: Option<Money>) -> Vec<&'static str> {
        match value {
            Some(_) => Vec::new(),
            None => vec!["is not a number", "can't be blank"],
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:.2}", self.currency.symbol(), self.amount())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exposes_minor_units_as_a_decimal() {
        let price = Money::from_cents(6499);
        assert_eq!(price.amount(), Decimal::new(6499, 2));
        assert_eq!(price.to_string(), "$64.99");
    }

    #[test]
    fn parses_decimal_input_into_cents() {
        assert_eq!(Money::parse("64.99").unwrap().cents, 6499);
        assert_eq!(Money::parse(" 1500 ").unwrap().cents, 150_000);
        assert_eq!(Money::parse("0.10").unwrap().cents, 10);
    }

    #[test]
    fn rejects_non_numeric_input() {
        assert_eq!(Money::parse("a dollar"), Err(MoneyError::NotANumber));
        assert_eq!(Money::parse(""), Err(MoneyError::NotANumber));
    }

    #[test]
    fn rejects_sub_cent_precision() {
        assert_eq!(Money::parse("0.999"), Err(MoneyError::Precision));
    }

    #[test]
    fn absent_amount_fails_both_sub_checks() {
        assert_eq!(
            Money::amount_checks(None),
            ["is not a number", "can't be blank"]
        );
        assert!(Money::amount_checks(Some(Money::from_cents(1500))).is_empty());
    }
}
