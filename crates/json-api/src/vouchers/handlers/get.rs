//! Get Voucher Handler

use std::sync::Arc;

use driftworks_app::domain::vouchers::records::VoucherUuid;
use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    state::State,
    vouchers::{errors::into_status_error, handlers::current_date, responses::VoucherResponse},
};

/// Get Voucher Handler
///
/// Returns one of the caller's vouchers.
#[endpoint(
    tags("vouchers"),
    summary = "Get Voucher",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    voucher: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<VoucherResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let voucher = state
        .app
        .vouchers
        .get_voucher(VoucherUuid::from_uuid(voucher.into_inner()))
        .await
        .map_err(into_status_error)?;

    if voucher.user != principal.user {
        return Err(StatusError::not_found().brief("Voucher not found"));
    }

    Ok(Json(VoucherResponse::new(voucher, current_date())))
}

#[cfg(test)]
mod tests {
    use driftworks::vouchers::VoucherStatus;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use driftworks_app::auth::UserUuid;

    use crate::test_helpers::{Mocks, TEST_CUSTOMER, voucher_record};

    use super::*;

    fn route() -> Router {
        Router::with_path("vouchers/{voucher}").get(handler)
    }

    #[tokio::test]
    async fn test_owner_gets_voucher() -> TestResult {
        let mut mocks = Mocks::default();
        let voucher = voucher_record(TEST_CUSTOMER, VoucherStatus::Active);
        let uuid = voucher.uuid;

        mocks
            .vouchers
            .expect_get_voucher()
            .once()
            .withf(move |requested| *requested == uuid)
            .return_once(move |_| Ok(voucher));

        let mut res = TestClient::get(format!("http://example.com/vouchers/{uuid}"))
            .send(&mocks.customer_service(route()))
            .await;

        let body: VoucherResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.uuid, uuid.into_uuid());
        assert_eq!(body.recipient_name.as_deref(), Some("Mika"));

        Ok(())
    }

    #[tokio::test]
    async fn test_foreign_voucher_returns_404() -> TestResult {
        let mut mocks = Mocks::default();
        let voucher = voucher_record(UserUuid::new(), VoucherStatus::Active);
        let uuid = voucher.uuid;

        mocks
            .vouchers
            .expect_get_voucher()
            .once()
            .return_once(move |_| Ok(voucher));

        let res = TestClient::get(format!("http://example.com/vouchers/{uuid}"))
            .send(&mocks.customer_service(route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
