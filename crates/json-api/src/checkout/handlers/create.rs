//! Create Checkout Handler

use std::sync::Arc;

use driftworks_app::checkout::{CheckoutOutcome, CheckoutRequest};
use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    cart::requests::{CartLineRequest, into_requested_lines},
    checkout::{errors::into_status_error, responses::CheckoutResponse},
    details::{ContactBody, ShippingAddressBody},
    extensions::*,
    observability::record_checkout,
    state::State,
};

/// Checkout Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutRequestBody {
    /// Lines of the client-held cart
    pub lines: Vec<CartLineRequest>,

    /// Contact details for the order
    pub contact: ContactBody,

    /// Required when anything has to be shipped
    #[serde(default)]
    pub shipping: Option<ShippingAddressBody>,
}

/// Create Checkout Handler
///
/// Re-prices the cart and either starts a payment (202) or, when nothing is
/// owed, creates the order straight away (201, or 200 when the order already
/// existed).
#[endpoint(
    tags("checkout"),
    summary = "Checkout",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order already placed"),
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::ACCEPTED, description = "Payment required"),
        (status_code = StatusCode::BAD_REQUEST, description = "Empty or malformed cart"),
        (status_code = StatusCode::NOT_FOUND, description = "Unknown product"),
        (status_code = StatusCode::CONFLICT, description = "Variant out of stock"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid contact or shipping details"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Payment could not be started"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CheckoutRequestBody>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CheckoutResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;
    let body = json.into_inner();

    let request = CheckoutRequest {
        user: principal.user,
        lines: into_requested_lines(body.lines)?,
        contact: body.contact.into(),
        shipping: body.shipping.map(Into::into),
    };

    let outcome = state
        .app
        .checkout
        .checkout(request)
        .await
        .map_err(|error| {
            record_checkout("rejected");

            into_status_error(error)
        })?;

    match &outcome {
        CheckoutOutcome::PaymentRequired { .. } => {
            record_checkout("payment_required");
            res.status_code(StatusCode::ACCEPTED);
        }
        CheckoutOutcome::Completed(created) if created.replayed => {
            record_checkout("replayed");
            res.status_code(StatusCode::OK);
        }
        CheckoutOutcome::Completed(created) => {
            record_checkout("completed");
            res.add_header(LOCATION, format!("/orders/{}", created.order.uuid), true)
                .or_500("failed to set location header")?
                .status_code(StatusCode::CREATED);
        }
    }

    Ok(Json(CheckoutResponse::new(outcome, state.app.currency)?))
}
