//! Profiles repository.

use driftworks::checkout::Contact;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    auth::UserUuid,
    domain::{
        columns::try_get_shipping,
        profiles::records::{ProfileRecord, ProfileSnapshot},
    },
};

const GET_PROFILE_SQL: &str = include_str!("sql/get_profile.sql");
const UPSERT_PROFILE_SQL: &str = include_str!("sql/upsert_profile.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProfilesRepository;

impl PgProfilesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_profile(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<ProfileRecord, sqlx::Error> {
        query_as::<Postgres, ProfileRecord>(GET_PROFILE_SQL)
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn upsert_profile(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        profile: &ProfileSnapshot,
    ) -> Result<ProfileRecord, sqlx::Error> {
        let shipping = profile.shipping.as_ref();

        query_as::<Postgres, ProfileRecord>(UPSERT_PROFILE_SQL)
            .bind(profile.user.into_uuid())
            .bind(&profile.contact.name)
            .bind(&profile.contact.email)
            .bind(&profile.contact.phone)
            .bind(shipping.map(|address| address.line1.as_str()))
            .bind(shipping.and_then(|address| address.line2.as_deref()))
            .bind(shipping.map(|address| address.city.as_str()))
            .bind(shipping.map(|address| address.postal_code.as_str()))
            .bind(shipping.map(|address| address.country.as_str()))
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for ProfileRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            user: UserUuid::from_uuid(row.try_get("user_uuid")?),
            contact: Contact {
                name: row.try_get("name")?,
                email: row.try_get("email")?,
                phone: row.try_get("phone")?,
            },
            shipping: try_get_shipping(row)?,
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
