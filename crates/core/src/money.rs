//! Money
//!
//! Amounts are carried as minor units everywhere in the domain. This module
//! converts them to [`rusty_money`] values for display.

use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use thiserror::Error;

/// Errors related to money conversion.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    /// Currency code is not supported.
    #[error("unknown currency: {0}")]
    UnknownCurrency(String),

    /// Amount does not fit a signed 64-bit minor unit value.
    #[error("amount out of range: {0}")]
    OutOfRange(u64),
}

/// Resolve a supported ISO currency code.
///
/// # Errors
///
/// Returns [`MoneyError::UnknownCurrency`] for anything but GBP, USD and EUR.
pub fn currency(code: &str) -> Result<&'static Currency, MoneyError> {
    match code.trim().to_uppercase().as_str() {
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        other => Err(MoneyError::UnknownCurrency(other.to_string())),
    }
}

/// Wrap a minor unit amount.
///
/// # Errors
///
/// Returns [`MoneyError::OutOfRange`] when the amount exceeds `i64::MAX`.
pub fn to_money(
    minor_units: u64,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, MoneyError> {
    let minor = i64::try_from(minor_units).map_err(|_err| MoneyError::OutOfRange(minor_units))?;

    Ok(Money::from_minor(minor, currency))
}

/// Render a minor unit amount with its currency symbol.
///
/// # Errors
///
/// Returns [`MoneyError::OutOfRange`] when the amount exceeds `i64::MAX`.
pub fn format_minor(minor_units: u64, currency: &'static Currency) -> Result<String, MoneyError> {
    to_money(minor_units, currency).map(|money| money.to_string())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn resolves_known_codes() -> TestResult {
        assert_eq!(currency("eur")?, EUR);
        assert_eq!(currency("GBP")?, GBP);

        Ok(())
    }

    #[test]
    fn rejects_unknown_code() {
        assert_eq!(
            currency("XYZ"),
            Err(MoneyError::UnknownCurrency("XYZ".to_string()))
        );
    }

    #[test]
    fn formats_with_symbol() -> TestResult {
        assert_eq!(format_minor(270, GBP)?, "£2.70");

        Ok(())
    }

    #[test]
    fn rejects_amounts_beyond_i64() {
        assert_eq!(
            to_money(u64::MAX, EUR).map(|money| *money.amount()),
            Err(MoneyError::OutOfRange(u64::MAX))
        );
    }
}
