//! Pending checkouts service errors.

use sqlx::Error;
use thiserror::Error;

use crate::domain::storage::{Fault, classify};

#[derive(Debug, Error)]
pub enum PendingCheckoutsServiceError {
    #[error("payment reference already used")]
    AlreadyExists,

    #[error("pending checkout not found")]
    NotFound,

    #[error("user not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for PendingCheckoutsServiceError {
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
