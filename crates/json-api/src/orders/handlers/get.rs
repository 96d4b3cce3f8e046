//! Get Order Handler

use std::sync::Arc;

use driftworks_app::domain::orders::records::OrderUuid;
use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, responses::OrderResponse},
    state::State,
};

/// Get Order Handler
///
/// Returns an order with its items. Customers only see their own orders.
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let order = state
        .app
        .orders
        .get_order(OrderUuid::from_uuid(order.into_inner()))
        .await
        .map_err(into_status_error)?;

    if order.user != principal.user && !principal.is_staff() {
        return Err(StatusError::not_found().brief("Order not found"));
    }

    Ok(Json(OrderResponse::new(order, state.app.currency)?))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use driftworks_app::{auth::UserUuid, domain::orders::OrdersServiceError};

    use crate::test_helpers::{Mocks, TEST_CUSTOMER, order_record};

    use super::*;

    fn route() -> Router {
        Router::with_path("orders/{order}").get(handler)
    }

    #[tokio::test]
    async fn test_owner_gets_order() -> TestResult {
        let mut mocks = Mocks::default();
        let order = order_record(TEST_CUSTOMER);
        let uuid = order.uuid;

        mocks
            .orders
            .expect_get_order()
            .once()
            .withf(move |requested| *requested == uuid)
            .return_once(move |_| Ok(order));

        let mut res = TestClient::get(format!("http://example.com/orders/{uuid}"))
            .send(&mocks.customer_service(route()))
            .await;

        let body: OrderResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.uuid, uuid.into_uuid());
        assert_eq!(body.contact.email, "keiichi@drift.test");

        Ok(())
    }

    #[tokio::test]
    async fn test_other_customers_order_returns_404() -> TestResult {
        let mut mocks = Mocks::default();
        let order = order_record(UserUuid::new());
        let uuid = order.uuid;

        mocks
            .orders
            .expect_get_order()
            .once()
            .return_once(move |_| Ok(order));

        let res = TestClient::get(format!("http://example.com/orders/{uuid}"))
            .send(&mocks.customer_service(route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_staff_reads_any_order() -> TestResult {
        let mut mocks = Mocks::default();
        let order = order_record(UserUuid::new());
        let uuid = order.uuid;

        mocks
            .orders
            .expect_get_order()
            .once()
            .return_once(move |_| Ok(order));

        let res = TestClient::get(format!("http://example.com/orders/{uuid}"))
            .send(&mocks.staff_service(route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_order_returns_404() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .orders
            .expect_get_order()
            .once()
            .return_once(|_| Err(OrdersServiceError::NotFound));

        let res = TestClient::get(format!("http://example.com/orders/{}", Uuid::new_v4()))
            .send(&mocks.customer_service(route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
