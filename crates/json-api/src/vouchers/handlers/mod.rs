//! Voucher Handlers

pub(crate) mod confirm_date;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod issue_missing;
pub(crate) mod redeem;
pub(crate) mod verify;

use driftworks::vouchers::today;
use jiff::{Timestamp, civil::Date};

fn current_date() -> Date {
    today(Timestamp::now())
}
