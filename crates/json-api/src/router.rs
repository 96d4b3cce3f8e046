//! App Router

use salvo::Router;

use crate::{auth, cart, checkout, healthcheck, orders, products, profile, vouchers};

/// Every API route. Public routes first, then routes that need a bearer token,
/// then staff-only routes.
pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .push(Router::with_path("{slug}").get(products::get::handler)),
        )
        .push(Router::with_path("cart/quote").post(cart::quote::handler))
        .push(Router::with_path("payments/webhook").post(checkout::webhook::handler))
        .push(customer_router())
        .push(staff_router())
}

fn customer_router() -> Router {
    Router::new()
        .hoop(auth::middleware::handler)
        .push(Router::with_path("checkout").post(checkout::create::handler))
        .push(Router::with_path("profile").get(profile::get::handler))
        .push(
            Router::with_path("orders")
                .get(orders::index::handler)
                .push(
                    Router::with_path("{order}")
                        .get(orders::get::handler)
                        .push(
                            Router::with_path("items/{item}/confirm-date")
                                .post(vouchers::confirm_date::handler),
                        ),
                ),
        )
        .push(
            Router::with_path("vouchers")
                .get(vouchers::index::handler)
                .push(Router::with_path("{voucher}").get(vouchers::get::handler)),
        )
}

fn staff_router() -> Router {
    Router::with_path("staff")
        .hoop(auth::middleware::handler)
        .hoop(auth::staff::require_staff)
        .push(
            Router::with_path("vouchers/{voucher}")
                .get(vouchers::verify::handler)
                .push(Router::with_path("redeem").post(vouchers::redeem::handler)),
        )
        .push(
            Router::with_path("orders/{order}")
                .push(Router::with_path("status").put(orders::status::handler))
                .push(Router::with_path("vouchers").post(vouchers::issue_missing::handler))
                .push(
                    Router::with_path("items/{item}/confirm-date")
                        .post(vouchers::confirm_date::staff_handler),
                ),
        )
}

#[cfg(test)]
mod tests {
    use driftworks_app::auth::{Principal, Role};
    use salvo::{
        affix_state::inject,
        http::{StatusCode, header::AUTHORIZATION},
        prelude::Service,
        test::TestClient,
    };
    use testresult::TestResult;
    use uuid::Uuid;

    use driftworks::vouchers::VoucherStatus;
    use driftworks_app::domain::vouchers::DateEditor;
    use serde_json::json;

    use crate::test_helpers::{Mocks, TEST_CUSTOMER, TEST_STAFF, voucher_record};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        Service::new(Router::new().hoop(inject(mocks.into_state())).push(app_router()))
    }

    #[tokio::test]
    async fn test_products_are_public() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.auth.expect_authenticate_bearer().never();
        mocks
            .catalog
            .expect_list_products()
            .once()
            .return_once(|| Ok(Vec::new()));

        let res = TestClient::get("http://example.com/products")
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_orders_need_a_token() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.orders.expect_list_orders().never();

        let res = TestClient::get("http://example.com/orders")
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_customers_cannot_redeem() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .auth
            .expect_authenticate_bearer()
            .once()
            .return_once(|_| {
                Ok(Principal {
                    user: TEST_CUSTOMER,
                    role: Role::Customer,
                })
            });

        mocks.vouchers.expect_redeem().never();

        let res = TestClient::post(format!(
            "http://example.com/staff/vouchers/{}/redeem",
            Uuid::new_v4()
        ))
        .add_header(AUTHORIZATION, "Bearer abc123", true)
        .send(&make_service(mocks))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }

    #[tokio::test]
    async fn test_staff_confirm_date_skips_ownership() -> TestResult {
        let mut mocks = Mocks::default();
        let voucher = voucher_record(TEST_CUSTOMER, VoucherStatus::Active);
        let order = voucher.order.into_uuid();
        let item = voucher.order_item.into_uuid();

        mocks
            .auth
            .expect_authenticate_bearer()
            .once()
            .return_once(|_| {
                Ok(Principal {
                    user: TEST_STAFF,
                    role: Role::Staff,
                })
            });

        mocks
            .vouchers
            .expect_confirm_date()
            .once()
            .withf(|editor, _, _, requested| *editor == DateEditor::Staff && requested.is_none())
            .return_once(move |_, _, _, _| Ok(voucher));

        let res = TestClient::post(format!(
            "http://example.com/staff/orders/{order}/items/{item}/confirm-date"
        ))
        .add_header(AUTHORIZATION, "Bearer abc123", true)
        .json(&json!({ "confirm_only": true }))
        .send(&make_service(mocks))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }
}
