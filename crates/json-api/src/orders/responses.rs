//! Order payloads

use driftworks::orders::OrderStatus;
use driftworks_app::domain::orders::records::{OrderItemRecord, OrderRecord};
use rusty_money::iso::Currency;
use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    details::{ContactBody, ShippingAddressBody},
    money::MoneyResponse,
};

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub(crate) enum OrderStatusBody {
    Pending,
    Approved,
    Shipped,
    Delivered,
    Cancelled,
}

impl From<OrderStatusBody> for OrderStatus {
    fn from(status: OrderStatusBody) -> Self {
        match status {
            OrderStatusBody::Pending => Self::Pending,
            OrderStatusBody::Approved => Self::Approved,
            OrderStatusBody::Shipped => Self::Shipped,
            OrderStatusBody::Delivered => Self::Delivered,
            OrderStatusBody::Cancelled => Self::Cancelled,
        }
    }
}

impl From<OrderStatus> for OrderStatusBody {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Pending => Self::Pending,
            OrderStatus::Approved => Self::Approved,
            OrderStatus::Shipped => Self::Shipped,
            OrderStatus::Delivered => Self::Delivered,
            OrderStatus::Cancelled => Self::Cancelled,
        }
    }
}

/// Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    /// The unique identifier of the order
    pub uuid: Uuid,

    /// Lifecycle status
    pub status: OrderStatusBody,

    /// Amount charged
    pub total: MoneyResponse,

    /// Contact details given at checkout
    pub contact: ContactBody,

    /// Shipping address, present when physical goods were ordered
    pub shipping: Option<ShippingAddressBody>,

    /// Line items as ordered
    pub items: Vec<OrderItemResponse>,

    /// The date and time the order was placed
    pub created_at: String,

    /// The date and time the order was last updated
    pub updated_at: String,
}

impl OrderResponse {
    pub(crate) fn new(order: OrderRecord, currency: &'static Currency) -> Result<Self, StatusError> {
        let items = order
            .items
            .into_iter()
            .map(|item| OrderItemResponse::new(item, currency))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            uuid: order.uuid.into_uuid(),
            status: order.status.into(),
            total: MoneyResponse::new(order.total, currency)?,
            contact: order.contact.into(),
            shipping: order.shipping.map(ShippingAddressBody::from),
            items,
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        })
    }
}

/// Order Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    /// The unique identifier of the order item
    pub uuid: Uuid,

    /// Product slug at the time of ordering
    pub product_slug: String,

    /// Product title at the time of ordering
    pub title: String,

    /// `physical` or `experience`
    pub kind: String,

    /// Price of one unit
    pub unit_price: MoneyResponse,

    /// Units ordered
    pub quantity: u32,

    /// Chosen variant, e.g. `color: black, size: M`
    pub variant: Option<String>,

    /// Stock keeping unit of the chosen variant
    pub sku: Option<String>,

    /// Experience location
    pub location: Option<String>,

    /// Selected addon names
    pub addons: Vec<String>,

    /// Voucher delivery mode
    pub delivery: Option<String>,

    /// Name printed on the voucher
    pub recipient_name: Option<String>,

    /// Experience date
    pub preferred_date: Option<String>,
}

impl OrderItemResponse {
    fn new(item: OrderItemRecord, currency: &'static Currency) -> Result<Self, StatusError> {
        let unit_price = MoneyResponse::new(item.unit_price, currency)?;

        Ok(Self {
            uuid: item.uuid.into_uuid(),
            product_slug: item.product_slug,
            title: item.title,
            kind: item.kind.as_str().to_string(),
            unit_price,
            quantity: item.quantity,
            variant: item.variant_description,
            sku: item.sku,
            location: item.location,
            addons: item.addons,
            delivery: item.delivery.map(|mode| mode.as_str().to_string()),
            recipient_name: item.recipient_name,
            preferred_date: item.preferred_date.map(|date| date.to_string()),
        })
    }
}
