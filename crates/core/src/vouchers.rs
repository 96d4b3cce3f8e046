//! Vouchers
//!
//! Voucher lifecycle rules. Stored statuses only ever move forward:
//! `pending -> active -> redeemed`. Expiry is never stored; it is derived from
//! the expiry date whenever a voucher is read and overrides the stored status
//! until the voucher has been redeemed.

use std::{fmt, str::FromStr};

use jiff::{Timestamp, ToSpan, civil::Date, tz::TimeZone};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::UnknownValue;

/// Default number of days a voucher stays valid after its date.
pub const DEFAULT_VALIDITY_DAYS: u16 = 365;

/// Reasons a voucher cannot be redeemed.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum VoucherStateError {
    /// No voucher with this id.
    #[error("voucher not found")]
    NotFound,

    /// The voucher was already used.
    #[error("voucher already redeemed")]
    AlreadyRedeemed,

    /// The expiry date has passed.
    #[error("voucher expired")]
    Expired,

    /// The experience date has not been confirmed yet.
    #[error("voucher is not active yet")]
    NotActive,
}

/// Status as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoucherStatus {
    /// Issued without a confirmed date.
    Pending,

    /// Date confirmed, may be redeemed.
    Active,

    /// Used. Terminal.
    Redeemed,
}

impl VoucherStatus {
    /// Storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Redeemed => "redeemed",
        }
    }

    /// Status of a newly issued voucher.
    pub const fn initial(date: Option<Date>) -> Self {
        if date.is_some() {
            Self::Active
        } else {
            Self::Pending
        }
    }
}

impl fmt::Display for VoucherStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoucherStatus {
    type Err = UnknownValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "redeemed" => Ok(Self::Redeemed),
            other => Err(UnknownValue {
                kind: "voucher status",
                value: other.to_string(),
            }),
        }
    }
}

/// Status shown to customers and staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStatus {
    /// Awaiting a confirmed date.
    Pending,

    /// Redeemable.
    Active,

    /// Used.
    Redeemed,

    /// Past its expiry date and never used.
    Expired,
}

impl DisplayStatus {
    /// Derive the display status from what is stored.
    ///
    /// A voucher whose expiry date lies before `today` is expired unless it
    /// was redeemed, whatever its stored status.
    pub fn derive(stored: VoucherStatus, expiry: Option<Date>, today: Date) -> Self {
        match stored {
            VoucherStatus::Redeemed => Self::Redeemed,
            _ if expiry.is_some_and(|expiry| expiry < today) => Self::Expired,
            VoucherStatus::Pending => Self::Pending,
            VoucherStatus::Active => Self::Active,
        }
    }

    /// Storage-style representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Redeemed => "redeemed",
            Self::Expired => "expired",
        }
    }

    /// Check the status allows redemption.
    ///
    /// # Errors
    ///
    /// Returns the [`VoucherStateError`] matching the blocking status.
    pub const fn ensure_redeemable(self) -> Result<(), VoucherStateError> {
        match self {
            Self::Active => Ok(()),
            Self::Redeemed => Err(VoucherStateError::AlreadyRedeemed),
            Self::Expired => Err(VoucherStateError::Expired),
            Self::Pending => Err(VoucherStateError::NotActive),
        }
    }
}

impl fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How long a voucher stays valid after its experience date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidityWindow {
    days: u16,
}

impl ValidityWindow {
    /// A window of `days` calendar days.
    pub const fn days(days: u16) -> Self {
        Self { days }
    }

    /// Number of days in the window.
    pub const fn len_days(self) -> u16 {
        self.days
    }

    /// Expiry date for a voucher dated `date`.
    ///
    /// # Errors
    ///
    /// Fails when the result falls outside the supported date range.
    pub fn expiry_for(self, date: Date) -> Result<Date, jiff::Error> {
        date.checked_add(i64::from(self.days).days())
    }
}

impl Default for ValidityWindow {
    fn default() -> Self {
        Self::days(DEFAULT_VALIDITY_DAYS)
    }
}

/// The calendar date vouchers are checked against.
pub fn today(now: Timestamp) -> Date {
    now.to_zoned(TimeZone::UTC).date()
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn year_long_window() -> TestResult {
        let expiry = ValidityWindow::default().expiry_for(date(2025, 6, 1))?;

        assert_eq!(expiry, date(2026, 6, 1));

        Ok(())
    }

    #[test]
    fn redemption_after_expiry_is_rejected() -> TestResult {
        let expiry = ValidityWindow::default().expiry_for(date(2025, 6, 1))?;

        let status = DisplayStatus::derive(VoucherStatus::Active, Some(expiry), date(2026, 6, 2));

        assert_eq!(status, DisplayStatus::Expired);
        assert_eq!(status.ensure_redeemable(), Err(VoucherStateError::Expired));

        Ok(())
    }

    #[test]
    fn expiry_day_itself_is_still_valid() {
        let status = DisplayStatus::derive(
            VoucherStatus::Active,
            Some(date(2026, 6, 1)),
            date(2026, 6, 1),
        );

        assert_eq!(status.ensure_redeemable(), Ok(()));
    }

    #[test]
    fn expiry_overrides_pending() {
        let status = DisplayStatus::derive(
            VoucherStatus::Pending,
            Some(date(2026, 6, 1)),
            date(2027, 1, 1),
        );

        assert_eq!(status, DisplayStatus::Expired);
    }

    #[test]
    fn redeemed_wins_over_expiry() {
        let status = DisplayStatus::derive(
            VoucherStatus::Redeemed,
            Some(date(2026, 6, 1)),
            date(2027, 1, 1),
        );

        assert_eq!(status, DisplayStatus::Redeemed);
        assert_eq!(
            status.ensure_redeemable(),
            Err(VoucherStateError::AlreadyRedeemed)
        );
    }

    #[test]
    fn pending_voucher_cannot_be_redeemed() {
        let status = DisplayStatus::derive(VoucherStatus::Pending, None, date(2026, 1, 1));

        assert_eq!(status.ensure_redeemable(), Err(VoucherStateError::NotActive));
    }

    #[test]
    fn initial_status_depends_on_date() {
        assert_eq!(
            VoucherStatus::initial(Some(date(2025, 6, 1))),
            VoucherStatus::Active
        );
        assert_eq!(VoucherStatus::initial(None), VoucherStatus::Pending);
    }

    #[test]
    fn today_uses_utc() -> TestResult {
        let now: Timestamp = "2026-06-01T23:30:00-02:00".parse()?;

        assert_eq!(today(now), date(2026, 6, 2));

        Ok(())
    }
}
