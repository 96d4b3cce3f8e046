//! Order Records

use driftworks::{
    catalog::{DeliveryMode, LineKind, ProductUuid},
    checkout::{Contact, ShippingAddress},
    orders::OrderStatus,
    uuids::TypedUuid,
};
use jiff::{Timestamp, civil::Date};

use crate::auth::UserUuid;

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItemRecord>;

/// Order Record
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub uuid: OrderUuid,
    pub user: UserUuid,
    pub total: u64,
    pub status: OrderStatus,
    pub contact: Contact,
    pub shipping: Option<ShippingAddress>,
    pub idempotency_token: String,
    pub items: Vec<OrderItemRecord>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl OrderRecord {
    /// Experience items that carry a confirmed date.
    pub fn dated_experiences(&self) -> impl Iterator<Item = &OrderItemRecord> {
        self.items
            .iter()
            .filter(|item| item.kind == LineKind::Experience && item.preferred_date.is_some())
    }
}

/// Order Item Record
///
/// Everything shown on a receipt or voucher is copied here when the order is
/// created; later catalog edits do not change it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItemRecord {
    pub uuid: OrderItemUuid,
    pub order: OrderUuid,
    pub product: ProductUuid,
    pub product_slug: String,
    pub title: String,
    pub kind: LineKind,
    pub unit_price: u64,
    pub quantity: u32,
    pub variant_description: Option<String>,
    pub sku: Option<String>,
    pub location: Option<String>,
    pub addons: Vec<String>,
    pub delivery: Option<DeliveryMode>,
    pub recipient_name: Option<String>,
    pub preferred_date: Option<Date>,
}

impl OrderItemRecord {
    /// Unit price times quantity, `None` on overflow.
    pub fn line_total(&self) -> Option<u64> {
        self.unit_price.checked_mul(u64::from(self.quantity))
    }
}

/// Result of [`create_order`](crate::domain::orders::OrdersService::create_order).
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedOrder {
    pub order: OrderRecord,

    /// `true` when the idempotency token was already used and the original
    /// order is returned unchanged.
    pub replayed: bool,
}
