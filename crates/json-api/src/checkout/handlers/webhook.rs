//! Payment Webhook Handler

use std::sync::Arc;

use driftworks_app::payments::{PaymentEvent, PaymentEventData, PaymentEventObject};
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    checkout::{errors::into_status_error, responses::WebhookResponse},
    extensions::*,
    observability::record_payment_confirmation,
    state::State,
};

/// Header carrying the shared webhook secret.
pub(crate) const WEBHOOK_SECRET_HEADER: &str = "x-webhook-secret";

/// Payment Event Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PaymentEventRequest {
    /// Event type, e.g. `payment_intent.succeeded`
    #[serde(rename = "type")]
    pub kind: String,

    pub data: PaymentEventDataBody,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PaymentEventDataBody {
    pub object: PaymentEventObjectBody,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PaymentEventObjectBody {
    /// Payment reference
    pub id: String,
}

impl From<PaymentEventRequest> for PaymentEvent {
    fn from(request: PaymentEventRequest) -> Self {
        Self {
            kind: request.kind,
            data: PaymentEventData {
                object: PaymentEventObject {
                    id: request.data.object.id,
                },
            },
        }
    }
}

/// Payment Webhook Handler
///
/// Called by the payment provider. A succeeded payment turns the checkout
/// parked under its reference into an order; other events are acknowledged
/// and ignored.
#[endpoint(
    tags("checkout"),
    summary = "Payment Webhook",
    responses(
        (status_code = StatusCode::OK, description = "Event received"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing or wrong webhook secret"),
        (status_code = StatusCode::NOT_FOUND, description = "No pending checkout for this payment"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<PaymentEventRequest>,
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<WebhookResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let authorized = req
        .header::<String>(WEBHOOK_SECRET_HEADER)
        .is_some_and(|secret| state.webhook_secret.matches(&secret));

    if !authorized {
        return Err(StatusError::unauthorized().brief("Invalid webhook secret"));
    }

    let event = PaymentEvent::from(json.into_inner());

    let Some(reference) = event.confirmed_reference() else {
        debug!(kind = %event.kind, "ignoring payment event");
        record_payment_confirmation("ignored");

        return Ok(Json(WebhookResponse {
            received: true,
            order_uuid: None,
            replayed: false,
        }));
    };

    let created = state
        .app
        .checkout
        .confirm_payment(reference)
        .await
        .map_err(|error| {
            record_payment_confirmation("failed");

            into_status_error(error)
        })?;

    record_payment_confirmation(if created.replayed { "replayed" } else { "created" });

    info!(
        payment_reference = %reference,
        order_uuid = %created.order.uuid,
        replayed = created.replayed,
        "payment confirmed"
    );

    Ok(Json(WebhookResponse {
        received: true,
        order_uuid: Some(created.order.uuid.into_uuid()),
        replayed: created.replayed,
    }))
}
