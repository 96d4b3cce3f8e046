//! Errors

use driftworks::{cart::CartError, pricing::PricingError};
use salvo::http::StatusError;
use tracing::{error, warn};

use driftworks_app::checkout::CheckoutError;

pub(crate) fn into_status_error(error: CheckoutError) -> StatusError {
    match error {
        CheckoutError::EmptyCart => StatusError::bad_request().brief("Cart is empty"),
        CheckoutError::Validation(errors) => {
            StatusError::unprocessable_entity().brief(errors.to_string())
        }
        CheckoutError::Cart(source) => cart_status_error(source),
        CheckoutError::Payment(source) => {
            warn!("payment provider rejected intent: {source}");

            StatusError::bad_gateway().brief("Payment could not be started")
        }
        CheckoutError::PendingCheckoutNotFound => {
            StatusError::not_found().brief("No pending checkout for this payment")
        }
        CheckoutError::Catalog(source) => {
            error!("catalog lookup failed during checkout: {source}");

            StatusError::internal_server_error()
        }
        CheckoutError::PendingCheckout(source) => {
            error!("pending checkout storage failed: {source}");

            StatusError::internal_server_error()
        }
        CheckoutError::Orders(source) => crate::orders::errors::into_status_error(source),
    }
}

fn cart_status_error(error: CartError) -> StatusError {
    match error {
        CartError::UnknownProduct(_) => StatusError::not_found().brief(error.to_string()),
        CartError::Pricing {
            source: PricingError::OutOfStock { .. },
            ..
        } => StatusError::conflict().brief(error.to_string()),
        CartError::QuantityOutOfBounds(_) | CartError::Selection(_) | CartError::Pricing { .. } => {
            StatusError::unprocessable_entity().brief(error.to_string())
        }
        CartError::UnknownLine(_)
        | CartError::DuplicateLine(_)
        | CartError::NotAnExperience(_)
        | CartError::VariantLocked(_) => StatusError::bad_request().brief(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use driftworks::{cart::LineUuid, catalog::ProductUuid, selection::SelectionError};
    use driftworks_app::payments::PaymentError;
    use salvo::http::StatusCode;

    use super::*;

    #[test]
    fn test_cart_errors_map_to_client_statuses() {
        let cases = [
            (
                CartError::UnknownProduct(ProductUuid::new()),
                StatusCode::NOT_FOUND,
            ),
            (
                CartError::QuantityOutOfBounds(11),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                CartError::Selection(SelectionError::RecipientNameTooLong),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                CartError::Pricing {
                    line: LineUuid::new(),
                    source: PricingError::OutOfStock {
                        sku: "TEE-BLK-S".to_string(),
                        available: 0,
                        requested: 1,
                    },
                },
                StatusCode::CONFLICT,
            ),
            (
                CartError::DuplicateLine(LineUuid::new()),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(into_status_error(CheckoutError::Cart(error)).code, expected);
        }
    }

    #[test]
    fn test_payment_failure_is_bad_gateway() {
        let error = CheckoutError::Payment(PaymentError::UnexpectedResponse(
            "card_declined".to_string(),
        ));

        assert_eq!(into_status_error(error).code, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_empty_cart_is_bad_request() {
        assert_eq!(
            into_status_error(CheckoutError::EmptyCart).code,
            StatusCode::BAD_REQUEST
        );
    }
}
