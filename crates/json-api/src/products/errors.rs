//! Errors

use salvo::http::StatusError;
use tracing::error;

use driftworks_app::domain::catalog::CatalogServiceError;

pub(crate) fn into_status_error(error: CatalogServiceError) -> StatusError {
    match error {
        CatalogServiceError::NotFound => StatusError::not_found().brief("Product not found"),
        CatalogServiceError::AlreadyExists => {
            StatusError::conflict().brief("Product already exists")
        }
        CatalogServiceError::InvalidReference
        | CatalogServiceError::MissingRequiredData
        | CatalogServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid product payload")
        }
        CatalogServiceError::Sql(source) => {
            error!("catalog storage failed: {source}");

            StatusError::internal_server_error()
        }
    }
}
