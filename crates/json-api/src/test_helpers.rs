//! Test helpers.

use std::sync::Arc;

use driftworks::{
    catalog::{DeliveryMode, LineKind, ProductUuid},
    checkout::Contact,
    fixtures::{Fixture, FixtureError},
    orders::OrderStatus,
    vouchers::VoucherStatus,
};
use driftworks_app::{
    auth::{MockAuthService, Principal, Role, UserUuid},
    checkout::MockCheckoutService,
    context::AppContext,
    domain::{
        catalog::MockCatalogService,
        orders::{
            MockOrdersService,
            records::{OrderItemRecord, OrderItemUuid, OrderRecord, OrderUuid},
        },
        profiles::MockProfilesService,
        vouchers::{
            MockVouchersService,
            records::{VoucherRecord, VoucherUuid},
        },
    },
    payments::WebhookSecret,
};
use jiff::{Timestamp, civil::date};
use rusty_money::iso::EUR;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, state::State};

pub(crate) const TEST_CUSTOMER: UserUuid =
    UserUuid::from_uuid(Uuid::from_u128(0x0195_d4b2_6f1e_7c3a_9a4b_2f7c_1d9e_8a10));

pub(crate) const TEST_STAFF: UserUuid =
    UserUuid::from_uuid(Uuid::from_u128(0x0195_d4b2_6f1e_7c3a_9a4b_2f7c_1d9e_8a11));

pub(crate) const TEST_WEBHOOK_SECRET: &str = "whsec_test";

#[salvo::handler]
pub(crate) async fn inject_customer(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_principal(Principal {
        user: TEST_CUSTOMER,
        role: Role::Customer,
    });
    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
pub(crate) async fn inject_staff(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_principal(Principal {
        user: TEST_STAFF,
        role: Role::Staff,
    });
    ctrl.call_next(req, depot, res).await;
}

/// Service mocks. Any call without a matching expectation fails the test.
#[derive(Default)]
pub(crate) struct Mocks {
    pub(crate) catalog: MockCatalogService,
    pub(crate) orders: MockOrdersService,
    pub(crate) vouchers: MockVouchersService,
    pub(crate) profiles: MockProfilesService,
    pub(crate) checkout: MockCheckoutService,
    pub(crate) auth: MockAuthService,
}

impl Mocks {
    pub(crate) fn into_state(self) -> Arc<State> {
        let app = AppContext {
            catalog: Arc::new(self.catalog),
            orders: Arc::new(self.orders),
            vouchers: Arc::new(self.vouchers),
            profiles: Arc::new(self.profiles),
            checkout: Arc::new(self.checkout),
            auth: Arc::new(self.auth),
            currency: EUR,
        };

        State::shared(app, WebhookSecret::new(TEST_WEBHOOK_SECRET))
    }

    /// Serve `route` without a caller.
    pub(crate) fn bare_service(self, route: Router) -> Service {
        Service::new(Router::new().hoop(inject(self.into_state())).push(route))
    }

    /// Serve `route` as [`TEST_CUSTOMER`].
    pub(crate) fn customer_service(self, route: Router) -> Service {
        Service::new(
            Router::new()
                .hoop(inject(self.into_state()))
                .hoop(inject_customer)
                .push(route),
        )
    }

    /// Serve `route` as [`TEST_STAFF`].
    pub(crate) fn staff_service(self, route: Router) -> Service {
        Service::new(
            Router::new()
                .hoop(inject(self.into_state()))
                .hoop(inject_staff)
                .push(route),
        )
    }
}

pub(crate) fn drift_fixture() -> Result<Fixture, FixtureError> {
    let mut fixture =
        Fixture::with_base_path(concat!(env!("CARGO_MANIFEST_DIR"), "/../core/fixtures"));

    fixture.load_catalog("drift")?;

    Ok(fixture)
}

pub(crate) fn contact() -> Contact {
    Contact {
        name: "Keiichi Tsuchiya".to_string(),
        email: "keiichi@drift.test".to_string(),
        phone: "+49 2691 302 0".to_string(),
    }
}

/// A paid drift taxi order owned by `user`.
pub(crate) fn order_record(user: UserUuid) -> OrderRecord {
    let uuid = OrderUuid::random();

    OrderRecord {
        uuid,
        user,
        total: 325_00,
        status: OrderStatus::Pending,
        contact: contact(),
        shipping: None,
        idempotency_token: "pi_123".to_string(),
        items: vec![OrderItemRecord {
            uuid: OrderItemUuid::random(),
            order: uuid,
            product: ProductUuid::new(),
            product_slug: "drift-taxi".to_string(),
            title: "Drift Taxi".to_string(),
            kind: LineKind::Experience,
            unit_price: 325_00,
            quantity: 1,
            variant_description: None,
            sku: None,
            location: Some("Nürburgring".to_string()),
            addons: vec!["E-mail voucher".to_string()],
            delivery: Some(DeliveryMode::Digital),
            recipient_name: Some("Mika".to_string()),
            preferred_date: Some(date(2025, 6, 1)),
        }],
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

/// A drift taxi voucher owned by `user`, dated 2025-06-01.
pub(crate) fn voucher_record(user: UserUuid, status: VoucherStatus) -> VoucherRecord {
    VoucherRecord {
        uuid: VoucherUuid::random(),
        order: OrderUuid::random(),
        order_item: OrderItemUuid::random(),
        user,
        product_slug: "drift-taxi".to_string(),
        product_title: "Drift Taxi".to_string(),
        date: Some(date(2025, 6, 1)),
        expiry_date: Some(date(2026, 6, 1)),
        addons: vec!["E-mail voucher".to_string()],
        recipient_name: Some("Mika".to_string()),
        location: Some("Nürburgring".to_string()),
        delivery: Some(DeliveryMode::Digital),
        customer_name: "Keiichi Tsuchiya".to_string(),
        customer_email: "keiichi@drift.test".to_string(),
        status,
        redeemed_at: None,
        created_at: Timestamp::UNIX_EPOCH,
    }
}
