//! Confirm Experience Date Handler

use std::sync::Arc;

use driftworks_app::domain::{
    orders::records::{OrderItemUuid, OrderUuid},
    vouchers::{DateEditor, records::VoucherUuid},
};
use jiff::civil::Date;
use salvo::{
    http::header::LOCATION,
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    extensions::*,
    state::State,
    vouchers::{errors::into_status_error, handlers::current_date, responses::VoucherResponse},
};

/// Confirm Date Request
///
/// Send either a new `date` or `confirm_only: true`, never both.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct ConfirmDateRequest {
    /// New experience date (`YYYY-MM-DD`), replacing the current one
    #[serde(default)]
    pub date: Option<String>,

    /// Accept the date chosen at checkout as final
    #[serde(default)]
    pub confirm_only: bool,
}

impl ConfirmDateRequest {
    /// `None` keeps the stored date.
    fn requested_date(self) -> Result<Option<Date>, StatusError> {
        match (self.date, self.confirm_only) {
            (Some(_), true) => Err(StatusError::bad_request()
                .brief("send either date or confirm_only, not both")),
            (None, false) => Err(StatusError::bad_request()
                .brief("send a date, or confirm_only to keep the current one")),
            (None, true) => Ok(None),
            (Some(date), false) => date
                .parse::<Date>()
                .map(Some)
                .or_400("date must be formatted as YYYY-MM-DD"),
        }
    }
}

async fn confirm(
    editor: DateEditor,
    order: PathParam<Uuid>,
    item: PathParam<Uuid>,
    json: JsonBody<ConfirmDateRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<VoucherResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let date = json.into_inner().requested_date()?;

    let voucher = state
        .app
        .vouchers
        .confirm_date(
            editor,
            OrderUuid::from_uuid(order.into_inner()),
            OrderItemUuid::from_uuid(item.into_inner()),
            date,
        )
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, voucher_location(voucher.uuid), true)
        .or_500("failed to set location header")?;

    Ok(Json(VoucherResponse::new(voucher, current_date())))
}

/// Confirm Date Handler
///
/// Fixes the experience date of one of the caller's order items and returns
/// its voucher, issuing it first when the item has none. `confirm_only`
/// accepts the date chosen at checkout; `date` replaces it.
#[endpoint(
    tags("vouchers"),
    summary = "Confirm Experience Date (date replaces, confirm_only keeps the checkout date)",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Date confirmed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Malformed date, or both/neither of date and confirm_only"),
        (status_code = StatusCode::NOT_FOUND, description = "Order item not found"),
        (status_code = StatusCode::CONFLICT, description = "Voucher already redeemed"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "No date on record, or date in the past"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    item: PathParam<Uuid>,
    json: JsonBody<ConfirmDateRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<VoucherResponse>, StatusError> {
    let editor = DateEditor::Owner(depot.principal_or_401()?.user);

    confirm(editor, order, item, json, depot, res).await
}

/// Staff Confirm Date Handler
///
/// Same as the customer endpoint, for any customer's order.
#[endpoint(
    tags("staff"),
    summary = "Confirm Or Edit A Customer's Experience Date",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Date confirmed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Malformed date, or both/neither of date and confirm_only"),
        (status_code = StatusCode::NOT_FOUND, description = "Order item not found"),
        (status_code = StatusCode::CONFLICT, description = "Voucher already redeemed"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "No date on record, or date in the past"),
    ),
)]
pub(crate) async fn staff_handler(
    order: PathParam<Uuid>,
    item: PathParam<Uuid>,
    json: JsonBody<ConfirmDateRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<VoucherResponse>, StatusError> {
    confirm(DateEditor::Staff, order, item, json, depot, res).await
}

fn voucher_location(voucher: VoucherUuid) -> String {
    format!("/vouchers/{voucher}")
}

#[cfg(test)]
mod tests {
    use driftworks::vouchers::VoucherStatus;
    use jiff::civil::date;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use driftworks_app::domain::vouchers::VouchersServiceError;

    use crate::test_helpers::{Mocks, TEST_CUSTOMER, voucher_record};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        mocks.customer_service(
            Router::with_path("orders/{order}/items/{item}/confirm-date").post(handler),
        )
    }

    fn url(order: Uuid, item: Uuid) -> String {
        format!("http://example.com/orders/{order}/items/{item}/confirm-date")
    }

    #[tokio::test]
    async fn test_new_date_is_forwarded() -> TestResult {
        let mut mocks = Mocks::default();
        let mut voucher = voucher_record(TEST_CUSTOMER, VoucherStatus::Active);
        let order = voucher.order;
        let item = voucher.order_item;

        voucher.date = Some(date(2031, 5, 4));
        voucher.expiry_date = Some(date(2032, 5, 3));

        mocks
            .vouchers
            .expect_confirm_date()
            .once()
            .withf(move |editor, o, i, requested| {
                *editor == DateEditor::Owner(TEST_CUSTOMER)
                    && *o == order
                    && *i == item
                    && *requested == Some(date(2031, 5, 4))
            })
            .return_once(move |_, _, _, _| Ok(voucher));

        let mut res = TestClient::post(url(order.into_uuid(), item.into_uuid()))
            .json(&json!({ "date": "2031-05-04" }))
            .send(&make_service(mocks))
            .await;

        let body: VoucherResponse = res.take_json().await?;
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.date.as_deref(), Some("2031-05-04"));
        assert_eq!(body.status, "active");
        assert_eq!(location, Some(format!("/vouchers/{}", body.uuid).as_str()));

        Ok(())
    }

    #[tokio::test]
    async fn test_confirm_only_keeps_existing_date() -> TestResult {
        let mut mocks = Mocks::default();
        let voucher = voucher_record(TEST_CUSTOMER, VoucherStatus::Active);
        let order = voucher.order.into_uuid();
        let item = voucher.order_item.into_uuid();

        mocks
            .vouchers
            .expect_confirm_date()
            .once()
            .withf(|_, _, _, requested| requested.is_none())
            .return_once(move |_, _, _, _| Ok(voucher));

        let res = TestClient::post(url(order, item))
            .json(&json!({ "confirm_only": true }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_date_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.vouchers.expect_confirm_date().never();

        let res = TestClient::post(url(Uuid::new_v4(), Uuid::new_v4()))
            .json(&json!({ "date": "01/06/2025" }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_date_with_confirm_only_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.vouchers.expect_confirm_date().never();

        let res = TestClient::post(url(Uuid::new_v4(), Uuid::new_v4()))
            .json(&json!({ "date": "2031-05-04", "confirm_only": true }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_body_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.vouchers.expect_confirm_date().never();

        let res = TestClient::post(url(Uuid::new_v4(), Uuid::new_v4()))
            .json(&json!({}))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_staff_edit_customer_date() -> TestResult {
        let mut mocks = Mocks::default();
        let mut voucher = voucher_record(TEST_CUSTOMER, VoucherStatus::Active);
        let order = voucher.order;
        let item = voucher.order_item;

        voucher.date = Some(date(2031, 6, 1));

        mocks
            .vouchers
            .expect_confirm_date()
            .once()
            .withf(move |editor, o, i, requested| {
                *editor == DateEditor::Staff
                    && *o == order
                    && *i == item
                    && *requested == Some(date(2031, 6, 1))
            })
            .return_once(move |_, _, _, _| Ok(voucher));

        let service = mocks.staff_service(
            Router::with_path("staff/orders/{order}/items/{item}/confirm-date")
                .post(staff_handler),
        );

        let mut res = TestClient::post(format!(
            "http://example.com/staff/orders/{}/items/{}/confirm-date",
            order.into_uuid(),
            item.into_uuid()
        ))
        .json(&json!({ "date": "2031-06-01" }))
        .send(&service)
        .await;

        let body: VoucherResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.date.as_deref(), Some("2031-06-01"));

        Ok(())
    }

    #[tokio::test]
    async fn test_past_date_returns_422() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .vouchers
            .expect_confirm_date()
            .once()
            .return_once(|_, _, _, _| Err(VouchersServiceError::DateInPast));

        let res = TestClient::post(url(Uuid::new_v4(), Uuid::new_v4()))
            .json(&json!({ "date": "2020-01-01" }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));

        Ok(())
    }

    #[tokio::test]
    async fn test_redeemed_voucher_returns_409() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .vouchers
            .expect_confirm_date()
            .once()
            .return_once(|_, _, _, _| {
                Err(VouchersServiceError::State(
                    driftworks::vouchers::VoucherStateError::AlreadyRedeemed,
                ))
            });

        let res = TestClient::post(url(Uuid::new_v4(), Uuid::new_v4()))
            .json(&json!({ "date": "2031-05-04" }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }
}
