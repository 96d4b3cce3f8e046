//! Money payloads

use driftworks::money::format_minor;
use rusty_money::iso::Currency;
use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};

use crate::extensions::*;

/// An amount in minor units with its display form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct MoneyResponse {
    /// Amount in minor units (cents)
    pub amount: u64,

    /// ISO currency code
    pub currency: String,

    /// Amount formatted for display, e.g. `€425,00`
    pub formatted: String,
}

impl MoneyResponse {
    pub(crate) fn new(amount: u64, currency: &'static Currency) -> Result<Self, StatusError> {
        let formatted = format_minor(amount, currency).or_500("failed to format amount")?;

        Ok(Self {
            amount,
            currency: currency.iso_alpha_code.to_string(),
            formatted,
        })
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::EUR;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn keeps_minor_units_and_code() -> TestResult {
        let money = MoneyResponse::new(425_00, EUR)?;

        assert_eq!(money.amount, 425_00);
        assert_eq!(money.currency, "EUR");
        assert!(money.formatted.contains("425"));

        Ok(())
    }

    #[test]
    fn amounts_beyond_i64_are_rejected() {
        let result = MoneyResponse::new(u64::MAX, EUR);

        assert!(result.is_err());
    }
}
