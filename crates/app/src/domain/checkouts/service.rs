//! Pending checkouts service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        checkouts::{
            errors::PendingCheckoutsServiceError, records::PendingCheckout,
            repository::PgPendingCheckoutsRepository,
        },
        orders::data::NewOrder,
    },
};

#[derive(Debug, Clone)]
pub struct PgPendingCheckoutsService {
    db: Db,
    repository: PgPendingCheckoutsRepository,
}

impl PgPendingCheckoutsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgPendingCheckoutsRepository::new(),
        }
    }
}

#[async_trait]
impl PendingCheckoutsService for PgPendingCheckoutsService {
    #[tracing::instrument(
        name = "checkouts.service.save_pending_checkout",
        skip(self, order),
        fields(user_uuid = %order.user, order_uuid = %order.uuid, total = order.total),
        err
    )]
    async fn save_pending_checkout(
        &self,
        payment_reference: String,
        order: NewOrder,
    ) -> Result<PendingCheckout, PendingCheckoutsServiceError> {
        let mut tx = self.db.begin().await?;

        let pending = self
            .repository
            .create_pending_checkout(&mut tx, &payment_reference, &order)
            .await?;

        tx.commit().await?;

        info!(payment_reference = %pending.payment_reference, "saved pending checkout");

        Ok(pending)
    }

    async fn get_pending_checkout(
        &self,
        payment_reference: &str,
    ) -> Result<PendingCheckout, PendingCheckoutsServiceError> {
        let mut tx = self.db.begin().await?;

        let pending = self
            .repository
            .get_pending_checkout(&mut tx, payment_reference)
            .await?;

        tx.commit().await?;

        Ok(pending)
    }
}

#[automock]
#[async_trait]
pub trait PendingCheckoutsService: Send + Sync {
    /// Park an order snapshot under the provider's payment reference.
    async fn save_pending_checkout(
        &self,
        payment_reference: String,
        order: NewOrder,
    ) -> Result<PendingCheckout, PendingCheckoutsServiceError>;

    /// Load the snapshot parked under `payment_reference`.
    async fn get_pending_checkout(
        &self,
        payment_reference: &str,
    ) -> Result<PendingCheckout, PendingCheckoutsServiceError>;
}
