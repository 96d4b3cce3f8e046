//! Update Order Status Handler

use std::sync::Arc;

use driftworks_app::domain::orders::records::OrderUuid;
use salvo::{
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
    orders::{
        errors::into_status_error,
        responses::{OrderResponse, OrderStatusBody},
    },
    state::State,
};

/// Update Order Status Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateOrderStatusRequest {
    /// Target status
    pub status: OrderStatusBody,
}

/// Update Order Status Handler
///
/// Moves an order through fulfilment. Transitions the lifecycle does not
/// allow answer 409.
#[endpoint(
    tags("staff"),
    summary = "Update Order Status",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Status updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::CONFLICT, description = "Transition not allowed"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<UpdateOrderStatusRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let order = state
        .app
        .orders
        .update_status(
            OrderUuid::from_uuid(order.into_inner()),
            json.into_inner().status.into(),
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(OrderResponse::new(order, state.app.currency)?))
}

#[cfg(test)]
mod tests {
    use driftworks::orders::{OrderStatus, OrderTransitionError};
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use driftworks_app::domain::orders::OrdersServiceError;

    use crate::test_helpers::{Mocks, TEST_CUSTOMER, order_record};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        mocks.staff_service(Router::with_path("staff/orders/{order}/status").put(handler))
    }

    #[tokio::test]
    async fn test_approves_order() -> TestResult {
        let mut mocks = Mocks::default();
        let mut order = order_record(TEST_CUSTOMER);
        let uuid = order.uuid;

        order.status = OrderStatus::Approved;

        mocks
            .orders
            .expect_update_status()
            .once()
            .withf(move |requested, to| *requested == uuid && *to == OrderStatus::Approved)
            .return_once(move |_, _| Ok(order));

        let mut res = TestClient::put(format!("http://example.com/staff/orders/{uuid}/status"))
            .json(&json!({ "status": "approved" }))
            .send(&make_service(mocks))
            .await;

        let body: OrderResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.status, OrderStatusBody::Approved);

        Ok(())
    }

    #[tokio::test]
    async fn test_illegal_transition_returns_409() -> TestResult {
        let mut mocks = Mocks::default();
        let uuid = Uuid::new_v4();

        mocks
            .orders
            .expect_update_status()
            .once()
            .return_once(|_, to| {
                Err(OrdersServiceError::Transition(OrderTransitionError {
                    from: OrderStatus::Delivered,
                    to,
                }))
            });

        let res = TestClient::put(format!("http://example.com/staff/orders/{uuid}/status"))
            .json(&json!({ "status": "pending" }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_status_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.orders.expect_update_status().never();

        let res = TestClient::put(format!(
            "http://example.com/staff/orders/{}/status",
            Uuid::new_v4()
        ))
        .json(&json!({ "status": "lost" }))
        .send(&make_service(mocks))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
