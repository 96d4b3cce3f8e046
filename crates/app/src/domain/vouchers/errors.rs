//! Vouchers service errors.

use driftworks::vouchers::VoucherStateError;
use sqlx::Error;
use thiserror::Error;

use crate::domain::storage::{Fault, classify};

#[derive(Debug, Error)]
pub enum VouchersServiceError {
    #[error("voucher already exists")]
    AlreadyExists,

    #[error("not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("order item is not an experience")]
    NotAnExperience,

    #[error("order item has no date to confirm")]
    NoDate,

    #[error("date lies in the past")]
    DateInPast,

    #[error("expiry date is out of range")]
    InvalidDate(#[source] jiff::Error),

    #[error(transparent)]
    State(#[from] VoucherStateError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for VouchersServiceError {
    fn from(error: Error) -> Self {
        match classify(&error) {
            Some(Fault::Missing) => Self::NotFound,
            Some(Fault::Duplicate) => Self::AlreadyExists,
            Some(Fault::DanglingReference) => Self::InvalidReference,
            Some(Fault::MissingValue) => Self::MissingRequiredData,
            Some(Fault::Rejected) => Self::InvalidData,
            None => Self::Sql(error),
        }
    }
}
