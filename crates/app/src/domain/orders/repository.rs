//! Orders Repository

use driftworks::{
    catalog::{DeliveryMode, LineKind, ProductUuid},
    checkout::Contact,
    orders::OrderStatus,
};
use jiff_sqlx::{Date as SqlxDate, Timestamp as SqlxTimestamp};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    auth::UserUuid,
    domain::{
        columns::{
            amount_param, count_param, position_param, try_get_amount, try_get_count,
            try_get_optional_parsed, try_get_parsed, try_get_shipping,
        },
        orders::{
            data::{NewOrder, NewOrderItem},
            records::{OrderItemRecord, OrderItemUuid, OrderRecord, OrderUuid},
        },
    },
};

const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const CREATE_ORDER_ITEM_SQL: &str = include_str!("sql/create_order_item.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const FIND_ORDER_BY_TOKEN_SQL: &str = include_str!("sql/find_order_by_token.sql");
const LIST_ORDERS_BY_USER_SQL: &str = include_str!("sql/list_orders_by_user.sql");
const LIST_ORDER_ITEMS_SQL: &str = include_str!("sql/list_order_items.sql");
const UPDATE_ORDER_STATUS_SQL: &str = include_str!("sql/update_order_status.sql");
const CONSUME_PENDING_CHECKOUT_SQL: &str = include_str!("sql/consume_pending_checkout.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Insert the order header. Returns `None` when the idempotency token is
    /// already taken.
    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &NewOrder,
    ) -> Result<Option<OrderUuid>, sqlx::Error> {
        let shipping = order.shipping.as_ref();

        let created: Option<Uuid> = query_scalar(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.user.into_uuid())
            .bind(amount_param(order.total, "total")?)
            .bind(&order.contact.name)
            .bind(&order.contact.email)
            .bind(&order.contact.phone)
            .bind(shipping.map(|address| address.line1.as_str()))
            .bind(shipping.and_then(|address| address.line2.as_deref()))
            .bind(shipping.map(|address| address.city.as_str()))
            .bind(shipping.map(|address| address.postal_code.as_str()))
            .bind(shipping.map(|address| address.country.as_str()))
            .bind(&order.idempotency_token)
            .fetch_optional(&mut **tx)
            .await?;

        Ok(created.map(OrderUuid::from_uuid))
    }

    pub(crate) async fn create_order_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        position: usize,
        item: &NewOrderItem,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_ORDER_ITEM_SQL)
            .bind(item.uuid.into_uuid())
            .bind(order.into_uuid())
            .bind(position_param(position, "position")?)
            .bind(item.product.into_uuid())
            .bind(&item.product_slug)
            .bind(&item.title)
            .bind(item.kind.as_str())
            .bind(amount_param(item.unit_price, "unit_price")?)
            .bind(count_param(item.quantity, "quantity")?)
            .bind(item.variant_description.as_deref())
            .bind(item.sku.as_deref())
            .bind(item.location.as_deref())
            .bind(&item.addons)
            .bind(item.delivery.map(DeliveryMode::as_str))
            .bind(item.recipient_name.as_deref())
            .bind(item.preferred_date.map(SqlxDate::from))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        let mut record = query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        record.items = self.list_items(tx, &[order.into_uuid()]).await?;

        Ok(record)
    }

    pub(crate) async fn find_order_by_token(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        token: &str,
    ) -> Result<OrderRecord, sqlx::Error> {
        let mut record = query_as::<Postgres, OrderRecord>(FIND_ORDER_BY_TOKEN_SQL)
            .bind(token)
            .fetch_one(&mut **tx)
            .await?;

        record.items = self.list_items(tx, &[record.uuid.into_uuid()]).await?;

        Ok(record)
    }

    /// Drop the snapshot parked under the order's payment reference. Returns
    /// `false` when nothing was parked, as for free orders.
    pub(crate) async fn consume_pending_checkout(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        payment_reference: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = query(CONSUME_PENDING_CHECKOUT_SQL)
            .bind(payment_reference)
            .execute(&mut **tx)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub(crate) async fn list_orders_by_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        let mut orders = query_as::<Postgres, OrderRecord>(LIST_ORDERS_BY_USER_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await?;

        let uuids: Vec<Uuid> = orders.iter().map(|order| order.uuid.into_uuid()).collect();
        let items = self.list_items(tx, &uuids).await?;

        for item in items {
            if let Some(order) = orders.iter_mut().find(|order| order.uuid == item.order) {
                order.items.push(item);
            }
        }

        Ok(orders)
    }

    /// Move an order from `from` to `to`. Returns `None` when the order is
    /// missing or no longer in `from`.
    pub(crate) async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<Option<OrderRecord>, sqlx::Error> {
        let record = query_as::<Postgres, OrderRecord>(UPDATE_ORDER_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(from.as_str())
            .bind(to.as_str())
            .fetch_optional(&mut **tx)
            .await?;

        let Some(mut record) = record else {
            return Ok(None);
        };

        record.items = self.list_items(tx, &[order.into_uuid()]).await?;

        Ok(Some(record))
    }

    async fn list_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &[Uuid],
    ) -> Result<Vec<OrderItemRecord>, sqlx::Error> {
        query_as::<Postgres, OrderItemRecord>(LIST_ORDER_ITEMS_SQL)
            .bind(orders)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            user: UserUuid::from_uuid(row.try_get("user_uuid")?),
            total: try_get_amount(row, "total")?,
            status: try_get_parsed::<OrderStatus>(row, "status")?,
            contact: Contact {
                name: row.try_get("contact_name")?,
                email: row.try_get("contact_email")?,
                phone: row.try_get("contact_phone")?,
            },
            shipping: try_get_shipping(row)?,
            idempotency_token: row.try_get("idempotency_token")?,
            items: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderItemUuid::from_uuid(row.try_get("uuid")?),
            order: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            product: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            product_slug: row.try_get("product_slug")?,
            title: row.try_get("title")?,
            kind: try_get_parsed::<LineKind>(row, "kind")?,
            unit_price: try_get_amount(row, "unit_price")?,
            quantity: try_get_count(row, "quantity")?,
            variant_description: row.try_get("variant_description")?,
            sku: row.try_get("sku")?,
            location: row.try_get("location")?,
            addons: row.try_get("addons")?,
            delivery: try_get_optional_parsed::<DeliveryMode>(row, "delivery_mode")?,
            recipient_name: row.try_get("recipient_name")?,
            preferred_date: row
                .try_get::<Option<SqlxDate>, _>("preferred_date")?
                .map(SqlxDate::to_jiff),
        })
    }
}
