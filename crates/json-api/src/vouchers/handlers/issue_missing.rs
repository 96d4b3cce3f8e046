//! Issue Missing Vouchers Handler

use std::sync::Arc;

use driftworks_app::domain::orders::records::OrderUuid;
use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    extensions::*,
    state::State,
    vouchers::{errors::into_status_error, handlers::current_date, responses::VoucherResponse},
};

/// Issued Vouchers Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct IssuedVouchersResponse {
    /// Vouchers created by this call
    pub issued: Vec<VoucherResponse>,
}

/// Issue Missing Vouchers Handler
///
/// Issues vouchers for dated experience items of an order that have none,
/// e.g. after issuance failed when the order was placed.
#[endpoint(
    tags("staff"),
    summary = "Issue Missing Vouchers",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<IssuedVouchersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let today = current_date();

    let issued = state
        .app
        .vouchers
        .issue_missing(OrderUuid::from_uuid(order.into_inner()))
        .await
        .map_err(into_status_error)?
        .into_iter()
        .map(|issued| VoucherResponse::new(issued.voucher, today))
        .collect();

    Ok(Json(IssuedVouchersResponse { issued }))
}
