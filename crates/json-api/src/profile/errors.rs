//! Errors

use salvo::http::StatusError;
use tracing::error;

use driftworks_app::domain::profiles::ProfilesServiceError;

pub(crate) fn into_status_error(error: ProfilesServiceError) -> StatusError {
    match error {
        ProfilesServiceError::NotFound | ProfilesServiceError::InvalidReference => {
            StatusError::not_found().brief("No saved checkout details")
        }
        ProfilesServiceError::MissingRequiredData | ProfilesServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid profile payload")
        }
        ProfilesServiceError::Sql(source) => {
            error!("profile storage failed: {source}");

            StatusError::internal_server_error()
        }
    }
}
