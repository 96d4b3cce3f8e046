//! Errors

use salvo::http::StatusError;
use tracing::error;

use driftworks_app::domain::orders::OrdersServiceError;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::AlreadyExists => StatusError::conflict().brief("Order already exists"),
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::InvalidReference
        | OrdersServiceError::MissingRequiredData
        | OrdersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid order payload")
        }
        OrdersServiceError::NoItems => StatusError::bad_request().brief("Order has no items"),
        OrdersServiceError::Transition(source) => StatusError::conflict().brief(source.to_string()),
        OrdersServiceError::TotalMismatch { total, items } => {
            error!("order total {total} does not match its items ({items})");

            StatusError::internal_server_error()
        }
        OrdersServiceError::Sql(source) => {
            error!("order storage failed: {source}");

            StatusError::internal_server_error()
        }
    }
}
