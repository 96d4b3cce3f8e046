//! Classify storage failures once for every service error type.

use sqlx::{Error, error::ErrorKind};

/// What a failed statement says about the caller's input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Fault {
    /// The row the statement needed is not there.
    Missing,
    Duplicate,
    /// A referenced row does not exist.
    DanglingReference,
    MissingValue,
    /// A `CHECK` constraint rejected a value.
    Rejected,
}

/// `None` means the failure is infrastructural and should surface as-is.
pub(crate) fn classify(error: &Error) -> Option<Fault> {
    if matches!(error, Error::RowNotFound) {
        return Some(Fault::Missing);
    }

    match error.as_database_error()?.kind() {
        ErrorKind::UniqueViolation => Some(Fault::Duplicate),
        ErrorKind::ForeignKeyViolation => Some(Fault::DanglingReference),
        ErrorKind::NotNullViolation => Some(Fault::MissingValue),
        ErrorKind::CheckViolation => Some(Fault::Rejected),
        _ => None,
    }
}
