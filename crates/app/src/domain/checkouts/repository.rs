//! Pending checkouts repository.

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, types::Json};

use crate::domain::{
    checkouts::records::PendingCheckout, columns::amount_param, orders::data::NewOrder,
};

const CREATE_PENDING_CHECKOUT_SQL: &str = include_str!("sql/create_pending_checkout.sql");
const GET_PENDING_CHECKOUT_SQL: &str = include_str!("sql/get_pending_checkout.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPendingCheckoutsRepository;

impl PgPendingCheckoutsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_pending_checkout(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        payment_reference: &str,
        order: &NewOrder,
    ) -> Result<PendingCheckout, sqlx::Error> {
        query_as::<Postgres, PendingCheckout>(CREATE_PENDING_CHECKOUT_SQL)
            .bind(payment_reference)
            .bind(order.user.into_uuid())
            .bind(amount_param(order.total, "total")?)
            .bind(Json(order))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_pending_checkout(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        payment_reference: &str,
    ) -> Result<PendingCheckout, sqlx::Error> {
        query_as::<Postgres, PendingCheckout>(GET_PENDING_CHECKOUT_SQL)
            .bind(payment_reference)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for PendingCheckout {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let Json(order) = row.try_get::<Json<NewOrder>, _>("snapshot")?;

        Ok(Self {
            payment_reference: row.try_get("payment_reference")?,
            order,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
