//! Money types with precise decimal arithmetic
//!
//! Compensation amounts, claimant-requested amounts and everything else that
//! carries a currency goes through [`Money`], which wraps a `rust_decimal`
//! value so that `300.00` is exactly `300.00`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Currency codes following ISO 4217
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    CNY,
    USD,
    EUR,
    GBP,
    HKD,
    JPY,
}

impl Currency {
    /// Returns the number of decimal places for this currency
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Returns the currency symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::CNY => "¥",
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::HKD => "HK$",
            Currency::JPY => "JP¥",
        }
    }

    /// Returns the ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::CNY => "CNY",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::HKD => "HKD",
            Currency::JPY => "JPY",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CNY" => Ok(Currency::CNY),
            "USD" => Ok(Currency::USD),
            "EUR" => Ok(Currency::EUR),
            "GBP" => Ok(Currency::GBP),
            "HKD" => Ok(Currency::HKD),
            "JPY" => Ok(Currency::JPY),
            other => Err(MoneyError::UnknownCurrency(other.to_string())),
        }
    }
}

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// A monetary amount with associated currency
///
/// Amounts keep the precision they were created with. Equality compares the
/// numeric value, so `300` and `300.00` are the same amount while `300.00004`
/// is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    /// Creates a new Money value
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Creates a non-negative amount, rejecting negative values
    pub fn non_negative(amount: Decimal, currency: Currency) -> Result<Self, MoneyError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(MoneyError::InvalidAmount(format!(
                "{} must not be negative",
                amount
            )));
        }
        Ok(Self::new(amount, currency))
    }

    /// Creates a zero amount in the specified currency
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Returns the amount
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the currency
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is positive
    pub fn is_positive(&self) -> bool {
        self.amount.is_sign_positive() && !self.amount.is_zero()
    }

    /// Returns true if the amount needs no more precision than the currency allows
    pub fn fits_currency_precision(&self) -> bool {
        self.amount.normalize().scale() <= self.currency.decimal_places()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dp = self.currency.decimal_places().max(self.amount.normalize().scale());
        write!(
            f,
            "{} {:.dp$}",
            self.currency.symbol(),
            self.amount,
            dp = dp as usize
        )
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn whole_fen_amounts_fit_currency_precision(fen in 0i64..1_000_000_000i64) {
            let money = Money::new(Decimal::new(fen, 2), Currency::CNY);
            prop_assert!(money.fits_currency_precision());
        }

        #[test]
        fn non_negative_accepts_exactly_the_non_negative(fen in -1_000_000i64..1_000_000i64) {
            let result = Money::non_negative(Decimal::new(fen, 2), Currency::CNY);
            prop_assert_eq!(result.is_ok(), fen >= 0);
        }
    }
}
