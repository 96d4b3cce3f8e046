//! List Vouchers Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    state::State,
    vouchers::{errors::into_status_error, handlers::current_date, responses::VoucherResponse},
};

/// List Vouchers Handler
///
/// Returns the caller's vouchers, newest first.
#[endpoint(
    tags("vouchers"),
    summary = "List Vouchers",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<Vec<VoucherResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;
    let today = current_date();

    let vouchers = state
        .app
        .vouchers
        .list_vouchers(principal.user)
        .await
        .map_err(into_status_error)?
        .into_iter()
        .map(|voucher| VoucherResponse::new(voucher, today))
        .collect();

    Ok(Json(vouchers))
}
