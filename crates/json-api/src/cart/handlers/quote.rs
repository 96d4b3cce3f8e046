//! Quote Cart Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    cart::{
        requests::{CartLineRequest, into_requested_lines},
        responses::CartResponse,
    },
    checkout::errors::into_status_error,
    extensions::*,
    state::State,
};

/// Quote Cart Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct QuoteCartRequest {
    /// Lines of the client-held cart
    pub lines: Vec<CartLineRequest>,
}

/// Quote Cart Handler
///
/// Prices a cart against the current catalog without placing anything.
#[endpoint(
    tags("cart"),
    summary = "Quote Cart",
    responses(
        (status_code = StatusCode::OK, description = "Cart priced"),
        (status_code = StatusCode::NOT_FOUND, description = "Unknown product"),
        (status_code = StatusCode::CONFLICT, description = "Variant out of stock"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Incomplete selection"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<QuoteCartRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let lines = into_requested_lines(json.into_inner().lines)?;

    let cart = state
        .app
        .checkout
        .quote(lines)
        .await
        .map_err(into_status_error)?;

    Ok(Json(CartResponse::new(&cart, state.app.currency)?))
}
