//! Profiles service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    auth::UserUuid,
    database::Db,
    domain::profiles::{
        errors::ProfilesServiceError,
        records::{ProfileRecord, ProfileSnapshot},
        repository::PgProfilesRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgProfilesService {
    db: Db,
    repository: PgProfilesRepository,
}

impl PgProfilesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProfilesRepository::new(),
        }
    }
}

#[async_trait]
impl ProfilesService for PgProfilesService {
    async fn get_profile(&self, user: UserUuid) -> Result<ProfileRecord, ProfilesServiceError> {
        let mut tx = self.db.begin().await?;

        let profile = self.repository.get_profile(&mut tx, user).await?;

        tx.commit().await?;

        Ok(profile)
    }

    #[tracing::instrument(
        name = "profiles.service.upsert_profile",
        skip(self, profile),
        fields(user_uuid = %profile.user, has_shipping = profile.shipping.is_some()),
        err
    )]
    async fn upsert_profile(
        &self,
        profile: ProfileSnapshot,
    ) -> Result<ProfileRecord, ProfilesServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.repository.upsert_profile(&mut tx, &profile).await?;

        tx.commit().await?;

        info!(user_uuid = %record.user, "saved profile");

        Ok(record)
    }
}

#[automock]
#[async_trait]
pub trait ProfilesService: Send + Sync {
    /// The stored checkout details of a user.
    async fn get_profile(&self, user: UserUuid) -> Result<ProfileRecord, ProfilesServiceError>;

    /// Replace the stored contact details, and the shipping address when one
    /// is given.
    async fn upsert_profile(
        &self,
        profile: ProfileSnapshot,
    ) -> Result<ProfileRecord, ProfilesServiceError>;
}
