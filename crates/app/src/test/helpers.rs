//! Test Helpers

use driftworks::{
    catalog::{DeliveryMode, LineKind, ProductUuid},
    checkout::{Contact, ShippingAddress},
    fixtures::{Fixture, FixtureError},
    orders::OrderStatus,
};
use jiff::{Timestamp, civil::Date};
use uuid::Uuid;

use crate::{
    auth::UserUuid,
    domain::orders::{
        data::{NewOrder, NewOrderItem},
        records::{CreatedOrder, OrderItemRecord, OrderItemUuid, OrderRecord, OrderUuid},
    },
};

/// The drift catalog fixture shipped with the core crate.
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

pub(crate) fn shipping() -> ShippingAddress {
    ShippingAddress {
        line1: "Otto-Flimm-Straße 1".to_string(),
        line2: None,
        city: "Nürburg".to_string(),
        postal_code: "53520".to_string(),
        country: "DE".to_string(),
    }
}

/// A drift taxi ride at the Nürburgring with an e-mailed voucher.
pub(crate) fn experience_item(date: Option<Date>) -> NewOrderItem {
    NewOrderItem {
        uuid: OrderItemUuid::random(),
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
        preferred_date: date,
    }
}

/// Black team t-shirts in size M.
pub(crate) fn tshirt_item(quantity: u32) -> NewOrderItem {
    NewOrderItem {
        uuid: OrderItemUuid::random(),
        product: ProductUuid::new(),
        product_slug: "team-tshirt".to_string(),
        title: "Team T-Shirt".to_string(),
        kind: LineKind::Physical,
        unit_price: 25_00,
        quantity,
        variant_description: Some("color: black, size: M".to_string()),
        sku: Some("TEE-BLK-M".to_string()),
        location: None,
        addons: Vec::new(),
        delivery: None,
        recipient_name: None,
        preferred_date: None,
    }
}

/// An order over `items` with a matching total and a fresh token.
pub(crate) fn new_order(user: UserUuid, items: Vec<NewOrderItem>) -> NewOrder {
    let total = items
        .iter()
        .map(|item| item.unit_price * u64::from(item.quantity))
        .sum();

    NewOrder {
        uuid: OrderUuid::random(),
        user,
        total,
        contact: contact(),
        shipping: None,
        idempotency_token: format!("test_{}", Uuid::new_v4().simple()),
        items,
    }
}

/// What the orders service would return for a freshly created `order`.
pub(crate) fn created_order(order: &NewOrder) -> CreatedOrder {
    let now = Timestamp::now();

    CreatedOrder {
        order: OrderRecord {
            uuid: order.uuid,
            user: order.user,
            total: order.total,
            status: OrderStatus::Pending,
            contact: order.contact.clone(),
            shipping: order.shipping.clone(),
            idempotency_token: order.idempotency_token.clone(),
            items: order
                .items
                .iter()
                .map(|item| OrderItemRecord {
                    uuid: item.uuid,
                    order: order.uuid,
                    product: item.product,
                    product_slug: item.product_slug.clone(),
                    title: item.title.clone(),
                    kind: item.kind,
                    unit_price: item.unit_price,
                    quantity: item.quantity,
                    variant_description: item.variant_description.clone(),
                    sku: item.sku.clone(),
                    location: item.location.clone(),
                    addons: item.addons.clone(),
                    delivery: item.delivery,
                    recipient_name: item.recipient_name.clone(),
                    preferred_date: item.preferred_date,
                })
                .collect(),
            created_at: now,
            updated_at: now,
        },
        replayed: false,
    }
}
