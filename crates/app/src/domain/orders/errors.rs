//! Orders service errors.

use driftworks::orders::OrderTransitionError;
use sqlx::Error;
use thiserror::Error;

use crate::domain::storage::{Fault, classify};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order already exists")]
    AlreadyExists,

    #[error("order not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("order has no items")]
    NoItems,

    #[error("order total {total} does not match its items ({items})")]
    TotalMismatch { total: u64, items: u64 },

    #[error(transparent)]
    Transition(#[from] OrderTransitionError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
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
