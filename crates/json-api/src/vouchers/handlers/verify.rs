//! Verify Voucher Handler

use std::sync::Arc;

use driftworks_app::domain::vouchers::records::VoucherUuid;
use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    state::State,
    vouchers::{errors::into_status_error, handlers::current_date, responses::VoucherResponse},
};

/// Verify Voucher Handler
///
/// Returns the verification snapshot of any voucher for staff at the track.
#[endpoint(
    tags("staff"),
    summary = "Verify Voucher",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    voucher: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<VoucherResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let voucher = state
        .app
        .vouchers
        .get_voucher(VoucherUuid::from_uuid(voucher.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(Json(VoucherResponse::new(voucher, current_date())))
}

#[cfg(test)]
mod tests {
    use driftworks::vouchers::VoucherStatus;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use driftworks_app::{auth::UserUuid, domain::vouchers::VouchersServiceError};

    use crate::test_helpers::{Mocks, voucher_record};

    use super::*;

    fn route() -> Router {
        Router::with_path("staff/vouchers/{voucher}").get(handler)
    }

    #[tokio::test]
    async fn test_staff_sees_customer_voucher() -> TestResult {
        let mut mocks = Mocks::default();
        let voucher = voucher_record(UserUuid::new(), VoucherStatus::Active);
        let uuid = voucher.uuid;

        mocks
            .vouchers
            .expect_get_voucher()
            .once()
            .withf(move |requested| *requested == uuid)
            .return_once(move |_| Ok(voucher));

        let mut res = TestClient::get(format!("http://example.com/staff/vouchers/{uuid}"))
            .send(&mocks.staff_service(route()))
            .await;

        let body: VoucherResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.customer_name, "Keiichi Tsuchiya");
        assert_eq!(body.location.as_deref(), Some("Nürburgring"));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_voucher_returns_404() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .vouchers
            .expect_get_voucher()
            .once()
            .return_once(|_| Err(VouchersServiceError::NotFound));

        let res = TestClient::get(format!("http://example.com/staff/vouchers/{}", Uuid::new_v4()))
            .send(&mocks.staff_service(route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
