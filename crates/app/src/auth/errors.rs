//! Auth service errors.

use sqlx::Error;
use thiserror::Error;

use crate::{
    auth::ApiTokenError,
    domain::storage::{Fault, classify},
};

#[derive(Debug, Error)]
pub enum AuthServiceError {
    #[error("token not found")]
    NotFound,

    #[error("user already exists")]
    AlreadyExists,

    #[error("user not found")]
    UnknownUser,

    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("storage error")]
    Sql(#[source] Error),

    #[error("token processing error")]
    Token(#[source] ApiTokenError),
}

impl From<Error> for AuthServiceError {
    fn from(error: Error) -> Self {
        // Token lookups use `fetch_optional`, so a missing row never reaches here.
        match classify(&error) {
            Some(Fault::Duplicate) => Self::AlreadyExists,
            Some(Fault::DanglingReference) => Self::UnknownUser,
            _ => Self::Sql(error),
        }
    }
}

impl From<ApiTokenError> for AuthServiceError {
    fn from(error: ApiTokenError) -> Self {
        Self::Token(error)
    }
}
