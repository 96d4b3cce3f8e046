//! Vouchers Repository

use driftworks::{
    catalog::{DeliveryMode, LineKind},
    vouchers::VoucherStatus,
};
use jiff::{Timestamp, civil::Date};
use jiff_sqlx::{Date as SqlxDate, Timestamp as SqlxTimestamp};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    auth::UserUuid,
    domain::{
        columns::{try_get_optional_parsed, try_get_parsed},
        orders::records::{OrderItemUuid, OrderUuid},
        vouchers::records::{IssuanceSource, NewVoucher, VoucherRecord, VoucherUuid},
    },
};

const GET_ISSUANCE_SOURCE_SQL: &str = include_str!("sql/get_issuance_source.sql");
const LIST_DATED_EXPERIENCE_ITEMS_SQL: &str = include_str!("sql/list_dated_experience_items.sql");
const SET_ITEM_DATE_SQL: &str = include_str!("sql/set_item_date.sql");
const CREATE_VOUCHER_SQL: &str = include_str!("sql/create_voucher.sql");
const GET_VOUCHER_SQL: &str = include_str!("sql/get_voucher.sql");
const FIND_VOUCHER_BY_ITEM_SQL: &str = include_str!("sql/find_voucher_by_item.sql");
const LIST_VOUCHERS_BY_USER_SQL: &str = include_str!("sql/list_vouchers_by_user.sql");
const SET_VOUCHER_DATE_SQL: &str = include_str!("sql/set_voucher_date.sql");
const REDEEM_VOUCHER_SQL: &str = include_str!("sql/redeem_voucher.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgVouchersRepository;

impl PgVouchersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_issuance_source(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: OrderItemUuid,
    ) -> Result<IssuanceSource, sqlx::Error> {
        query_as::<Postgres, IssuanceSource>(GET_ISSUANCE_SOURCE_SQL)
            .bind(item.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_dated_experience_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Vec<OrderItemUuid>, sqlx::Error> {
        let items: Vec<Uuid> = query_scalar(LIST_DATED_EXPERIENCE_ITEMS_SQL)
            .bind(order.into_uuid())
            .fetch_all(&mut **tx)
            .await?;

        Ok(items.into_iter().map(OrderItemUuid::from_uuid).collect())
    }

    pub(crate) async fn set_item_date(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: OrderItemUuid,
        date: Date,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(SET_ITEM_DATE_SQL)
            .bind(item.into_uuid())
            .bind(SqlxDate::from(date))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Insert a voucher. Returns `None` when the order item already has one.
    pub(crate) async fn create_voucher(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        voucher: &NewVoucher,
    ) -> Result<Option<VoucherRecord>, sqlx::Error> {
        let source = &voucher.source;

        query_as::<Postgres, VoucherRecord>(CREATE_VOUCHER_SQL)
            .bind(voucher.uuid.into_uuid())
            .bind(source.order.into_uuid())
            .bind(source.order_item.into_uuid())
            .bind(source.user.into_uuid())
            .bind(&source.product_slug)
            .bind(&source.product_title)
            .bind(source.date.map(SqlxDate::from))
            .bind(voucher.expiry_date.map(SqlxDate::from))
            .bind(&source.addons)
            .bind(source.recipient_name.as_deref())
            .bind(source.location.as_deref())
            .bind(source.delivery.map(DeliveryMode::as_str))
            .bind(&source.customer_name)
            .bind(&source.customer_email)
            .bind(voucher.status.as_str())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn get_voucher(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        voucher: VoucherUuid,
    ) -> Result<VoucherRecord, sqlx::Error> {
        query_as::<Postgres, VoucherRecord>(GET_VOUCHER_SQL)
            .bind(voucher.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_voucher_by_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: OrderItemUuid,
    ) -> Result<Option<VoucherRecord>, sqlx::Error> {
        query_as::<Postgres, VoucherRecord>(FIND_VOUCHER_BY_ITEM_SQL)
            .bind(item.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn list_vouchers_by_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<VoucherRecord>, sqlx::Error> {
        query_as::<Postgres, VoucherRecord>(LIST_VOUCHERS_BY_USER_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    /// Set the date of an unredeemed voucher and activate it.
    pub(crate) async fn set_voucher_date(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        voucher: VoucherUuid,
        date: Date,
        expiry_date: Date,
    ) -> Result<Option<VoucherRecord>, sqlx::Error> {
        query_as::<Postgres, VoucherRecord>(SET_VOUCHER_DATE_SQL)
            .bind(voucher.into_uuid())
            .bind(SqlxDate::from(date))
            .bind(SqlxDate::from(expiry_date))
            .fetch_optional(&mut **tx)
            .await
    }

    /// Mark an active, unexpired voucher as redeemed. Returns `None` when
    /// another redemption won or the voucher is not redeemable.
    pub(crate) async fn redeem_voucher(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        voucher: VoucherUuid,
        redeemed_at: Timestamp,
        today: Date,
    ) -> Result<Option<VoucherRecord>, sqlx::Error> {
        query_as::<Postgres, VoucherRecord>(REDEEM_VOUCHER_SQL)
            .bind(voucher.into_uuid())
            .bind(SqlxTimestamp::from(redeemed_at))
            .bind(SqlxDate::from(today))
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for VoucherRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: VoucherUuid::from_uuid(row.try_get("uuid")?),
            order: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            order_item: OrderItemUuid::from_uuid(row.try_get("order_item_uuid")?),
            user: UserUuid::from_uuid(row.try_get("user_uuid")?),
            product_slug: row.try_get("product_slug")?,
            product_title: row.try_get("product_title")?,
            date: row
                .try_get::<Option<SqlxDate>, _>("voucher_date")?
                .map(SqlxDate::to_jiff),
            expiry_date: row
                .try_get::<Option<SqlxDate>, _>("expiry_date")?
                .map(SqlxDate::to_jiff),
            addons: row.try_get("addons")?,
            recipient_name: row.try_get("recipient_name")?,
            location: row.try_get("location")?,
            delivery: try_get_optional_parsed::<DeliveryMode>(row, "delivery_mode")?,
            customer_name: row.try_get("customer_name")?,
            customer_email: row.try_get("customer_email")?,
            status: try_get_parsed::<VoucherStatus>(row, "status")?,
            redeemed_at: row
                .try_get::<Option<SqlxTimestamp>, _>("redeemed_at")?
                .map(SqlxTimestamp::to_jiff),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for IssuanceSource {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            order: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            order_item: OrderItemUuid::from_uuid(row.try_get("order_item_uuid")?),
            user: UserUuid::from_uuid(row.try_get("user_uuid")?),
            kind: try_get_parsed::<LineKind>(row, "kind")?,
            product_slug: row.try_get("product_slug")?,
            product_title: row.try_get("product_title")?,
            date: row
                .try_get::<Option<SqlxDate>, _>("preferred_date")?
                .map(SqlxDate::to_jiff),
            addons: row.try_get("addons")?,
            recipient_name: row.try_get("recipient_name")?,
            location: row.try_get("location")?,
            delivery: try_get_optional_parsed::<DeliveryMode>(row, "delivery_mode")?,
            customer_name: row.try_get("customer_name")?,
            customer_email: row.try_get("customer_email")?,
        })
    }
}
