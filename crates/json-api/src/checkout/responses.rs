//! Checkout payloads

use driftworks_app::checkout::CheckoutOutcome;
use rusty_money::iso::Currency;
use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{money::MoneyResponse, orders::responses::OrderResponse};

/// Where the checkout ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub(crate) enum CheckoutStatusBody {
    /// The client must complete payment before the order exists.
    PaymentRequired,

    /// The order exists.
    Completed,
}

/// Payment the client has to complete
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PaymentResponse {
    /// Secret handed to the payment widget
    pub client_secret: String,

    /// Provider reference the webhook will confirm
    pub payment_reference: String,

    /// Amount to pay
    pub total: MoneyResponse,
}

/// Checkout Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutResponse {
    pub status: CheckoutStatusBody,

    /// Present while payment is outstanding
    pub payment: Option<PaymentResponse>,

    /// Present once the order exists
    pub order: Option<OrderResponse>,
}

impl CheckoutResponse {
    pub(crate) fn new(
        outcome: CheckoutOutcome,
        currency: &'static Currency,
    ) -> Result<Self, StatusError> {
        match outcome {
            CheckoutOutcome::PaymentRequired {
                client_secret,
                payment_reference,
                total,
            } => Ok(Self {
                status: CheckoutStatusBody::PaymentRequired,
                payment: Some(PaymentResponse {
                    client_secret,
                    payment_reference,
                    total: MoneyResponse::new(total, currency)?,
                }),
                order: None,
            }),
            CheckoutOutcome::Completed(created) => Ok(Self {
                status: CheckoutStatusBody::Completed,
                payment: None,
                order: Some(OrderResponse::new(created.order, currency)?),
            }),
        }
    }
}

/// Webhook Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct WebhookResponse {
    /// The event was accepted
    pub received: bool,

    /// Order created (or found) for a confirmed payment
    pub order_uuid: Option<Uuid>,

    /// The payment had already been turned into an order
    pub replayed: bool,
}
