//! Column conversions shared by the repositories.

use std::{error::Error as StdError, str::FromStr};

use driftworks::checkout::ShippingAddress;
use sqlx::{Row, postgres::PgRow};

fn decode_error(col: &str, source: impl StdError + Send + Sync + 'static) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(source),
    }
}

/// Read a non-negative `BIGINT` minor unit amount.
pub(crate) fn try_get_amount(row: &PgRow, col: &str) -> Result<u64, sqlx::Error> {
    let amount_i64: i64 = row.try_get(col)?;

    u64::try_from(amount_i64).map_err(|e| decode_error(col, e))
}

/// Read a nullable `BIGINT` minor unit amount.
pub(crate) fn try_get_optional_amount(row: &PgRow, col: &str) -> Result<Option<u64>, sqlx::Error> {
    let amount_i64: Option<i64> = row.try_get(col)?;

    amount_i64
        .map(|amount| u64::try_from(amount).map_err(|e| decode_error(col, e)))
        .transpose()
}

/// Read a non-negative `INTEGER` count.
pub(crate) fn try_get_count(row: &PgRow, col: &str) -> Result<u32, sqlx::Error> {
    let count_i32: i32 = row.try_get(col)?;

    u32::try_from(count_i32).map_err(|e| decode_error(col, e))
}

/// Read a `TEXT` column holding an enum discriminator.
pub(crate) fn try_get_parsed<T>(row: &PgRow, col: &str) -> Result<T, sqlx::Error>
where
    T: FromStr,
    T::Err: StdError + Send + Sync + 'static,
{
    let value: String = row.try_get(col)?;

    value.parse().map_err(|e| decode_error(col, e))
}

/// Read a nullable `TEXT` column holding an enum discriminator.
pub(crate) fn try_get_optional_parsed<T>(row: &PgRow, col: &str) -> Result<Option<T>, sqlx::Error>
where
    T: FromStr,
    T::Err: StdError + Send + Sync + 'static,
{
    let value: Option<String> = row.try_get(col)?;

    value
        .map(|value| value.parse().map_err(|e| decode_error(col, e)))
        .transpose()
}

/// Read the `shipping_*` address columns. A missing first line means no
/// address was stored.
pub(crate) fn try_get_shipping(row: &PgRow) -> Result<Option<ShippingAddress>, sqlx::Error> {
    let Some(line1) = row.try_get::<Option<String>, _>("shipping_line1")? else {
        return Ok(None);
    };

    Ok(Some(ShippingAddress {
        line1,
        line2: row.try_get("shipping_line2")?,
        city: row
            .try_get::<Option<String>, _>("shipping_city")?
            .unwrap_or_default(),
        postal_code: row
            .try_get::<Option<String>, _>("shipping_postal_code")?
            .unwrap_or_default(),
        country: row
            .try_get::<Option<String>, _>("shipping_country")?
            .unwrap_or_default(),
    }))
}

/// Convert an amount for binding to a `BIGINT` column.
pub(crate) fn amount_param(amount: u64, col: &str) -> Result<i64, sqlx::Error> {
    i64::try_from(amount).map_err(|e| decode_error(col, e))
}

/// Convert a count for binding to an `INTEGER` column.
pub(crate) fn count_param(count: u32, col: &str) -> Result<i32, sqlx::Error> {
    i32::try_from(count).map_err(|e| decode_error(col, e))
}

/// Convert a list position for binding to an `INTEGER` column.
pub(crate) fn position_param(position: usize, col: &str) -> Result<i32, sqlx::Error> {
    i32::try_from(position).map_err(|e| decode_error(col, e))
}
