//! Profiles service errors.

use sqlx::Error;
use thiserror::Error;

use crate::domain::storage::{Fault, classify};

#[derive(Debug, Error)]
pub enum ProfilesServiceError {
    #[error("profile not found")]
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

impl From<Error> for ProfilesServiceError {
    fn from(error: Error) -> Self {
        match classify(&error) {
            Some(Fault::Missing) => Self::NotFound,
            Some(Fault::DanglingReference) => Self::InvalidReference,
            Some(Fault::MissingValue) => Self::MissingRequiredData,
            Some(Fault::Rejected) => Self::InvalidData,
            Some(Fault::Duplicate) | None => Self::Sql(error),
        }
    }
}
