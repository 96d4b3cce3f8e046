//! Redeem Voucher Handler

use std::sync::Arc;

use driftworks::vouchers::{VoucherStateError, today};
use driftworks_app::domain::vouchers::{VouchersServiceError, records::VoucherUuid};
use jiff::Timestamp;
use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    observability::record_voucher_redemption,
    state::State,
    vouchers::{errors::into_status_error, responses::VoucherResponse},
};

/// Redeem Voucher Handler
///
/// Marks a voucher as used. A voucher can be redeemed once; repeated calls
/// answer 409 and expired vouchers answer 410.
#[endpoint(
    tags("staff"),
    summary = "Redeem Voucher",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Voucher redeemed"),
        (status_code = StatusCode::NOT_FOUND, description = "Voucher not found"),
        (status_code = StatusCode::CONFLICT, description = "Voucher already redeemed or not active"),
        (status_code = StatusCode::GONE, description = "Voucher expired"),
    ),
)]
pub(crate) async fn handler(
    voucher: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<VoucherResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let now = Timestamp::now();

    let voucher = state
        .app
        .vouchers
        .redeem(VoucherUuid::from_uuid(voucher.into_inner()), now)
        .await
        .inspect(|_| record_voucher_redemption("redeemed"))
        .map_err(|error| {
            record_voucher_redemption(redemption_outcome(&error));

            into_status_error(error)
        })?;

    Ok(Json(VoucherResponse::new(voucher, today(now))))
}

fn redemption_outcome(error: &VouchersServiceError) -> &'static str {
    match error {
        VouchersServiceError::State(VoucherStateError::AlreadyRedeemed) => "already_redeemed",
        VouchersServiceError::State(VoucherStateError::Expired) => "expired",
        VouchersServiceError::State(VoucherStateError::NotActive) => "not_active",
        _ => "failed",
    }
}

#[cfg(test)]
mod tests {
    use driftworks::vouchers::VoucherStatus;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use driftworks_app::auth::UserUuid;

    use crate::test_helpers::{Mocks, voucher_record};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        mocks.staff_service(Router::with_path("staff/vouchers/{voucher}/redeem").post(handler))
    }

    async fn redeem_with(error: VoucherStateError) -> Option<StatusCode> {
        let mut mocks = Mocks::default();

        mocks
            .vouchers
            .expect_redeem()
            .once()
            .return_once(move |_, _| Err(VouchersServiceError::State(error)));

        TestClient::post(format!(
            "http://example.com/staff/vouchers/{}/redeem",
            Uuid::new_v4()
        ))
        .send(&make_service(mocks))
        .await
        .status_code
    }

    #[tokio::test]
    async fn test_redeems_voucher() -> TestResult {
        let mut mocks = Mocks::default();
        let mut voucher = voucher_record(UserUuid::new(), VoucherStatus::Redeemed);
        let uuid = voucher.uuid;

        voucher.redeemed_at = Some(Timestamp::now());

        mocks
            .vouchers
            .expect_redeem()
            .once()
            .withf(move |requested, _| *requested == uuid)
            .return_once(move |_, _| Ok(voucher));

        let mut res = TestClient::post(format!("http://example.com/staff/vouchers/{uuid}/redeem"))
            .send(&make_service(mocks))
            .await;

        let body: VoucherResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.status, "redeemed");
        assert!(body.redeemed_at.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn test_second_redemption_returns_409() {
        assert_eq!(
            redeem_with(VoucherStateError::AlreadyRedeemed).await,
            Some(StatusCode::CONFLICT)
        );
    }

    #[tokio::test]
    async fn test_expired_voucher_returns_410() {
        assert_eq!(
            redeem_with(VoucherStateError::Expired).await,
            Some(StatusCode::GONE)
        );
    }

    #[tokio::test]
    async fn test_pending_voucher_returns_409() {
        assert_eq!(
            redeem_with(VoucherStateError::NotActive).await,
            Some(StatusCode::CONFLICT)
        );
    }
}
