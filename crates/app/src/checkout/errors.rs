//! Checkout errors.

use driftworks::{cart::CartError, checkout::ValidationErrors};
use thiserror::Error;

use crate::{
    domain::{
        catalog::CatalogServiceError, checkouts::PendingCheckoutsServiceError,
        orders::OrdersServiceError,
    },
    payments::PaymentError,
};

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("checkout details are invalid: {0}")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error("catalog lookup failed")]
    Catalog(#[source] CatalogServiceError),

    #[error("payment could not be started")]
    Payment(#[from] PaymentError),

    #[error("no pending checkout for this payment")]
    PendingCheckoutNotFound,

    #[error("pending checkout could not be stored")]
    PendingCheckout(#[source] PendingCheckoutsServiceError),

    #[error("order could not be created")]
    Orders(#[from] OrdersServiceError),
}

impl From<CatalogServiceError> for CheckoutError {
    fn from(error: CatalogServiceError) -> Self {
        Self::Catalog(error)
    }
}

impl From<PendingCheckoutsServiceError> for CheckoutError {
    fn from(error: PendingCheckoutsServiceError) -> Self {
        match error {
            PendingCheckoutsServiceError::NotFound => Self::PendingCheckoutNotFound,
            other => Self::PendingCheckout(other),
        }
    }
}
