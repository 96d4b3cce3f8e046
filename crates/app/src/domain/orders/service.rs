//! Orders service.

use async_trait::async_trait;
use driftworks::{
    orders::{OrderStatus, OrderTransitionError},
    vouchers::ValidityWindow,
};
use mockall::automock;
use tracing::{Span, info, warn};

use crate::{
    auth::UserUuid,
    database::Db,
    domain::{
        orders::{
            data::NewOrder,
            errors::OrdersServiceError,
            records::{CreatedOrder, OrderItemUuid, OrderRecord, OrderUuid},
            repository::PgOrdersRepository,
        },
        profiles::{records::ProfileSnapshot, repository::PgProfilesRepository},
        vouchers::{VouchersServiceError, issuer::VoucherIssuer},
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    repository: PgOrdersRepository,
    issuer: VoucherIssuer,
    profiles: PgProfilesRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db, validity: ValidityWindow) -> Self {
        Self {
            db,
            repository: PgOrdersRepository::new(),
            issuer: VoucherIssuer::new(validity),
            profiles: PgProfilesRepository::new(),
        }
    }

    async fn issue_voucher(&self, item: OrderItemUuid) -> Result<(), VouchersServiceError> {
        let mut tx = self.db.begin().await?;

        let issued = self.issuer.issue_in(&mut tx, item).await?;

        tx.commit().await?;

        if issued.created {
            info!(
                voucher_uuid = %issued.voucher.uuid,
                order_item_uuid = %item,
                "issued voucher"
            );
        }

        Ok(())
    }

    async fn save_profile(&self, order: &OrderRecord) -> Result<(), sqlx::Error> {
        let snapshot = ProfileSnapshot {
            user: order.user,
            contact: order.contact.clone(),
            shipping: order.shipping.clone(),
        };

        let mut tx = self.db.begin().await?;

        self.profiles.upsert_profile(&mut tx, &snapshot).await?;

        tx.commit().await
    }

    /// Work that must not undo a committed order: failures are logged and the
    /// order stands.
    async fn after_commit(&self, order: &OrderRecord) {
        for item in order.dated_experiences() {
            if let Err(error) = self.issue_voucher(item.uuid).await {
                warn!(
                    order_uuid = %order.uuid,
                    order_item_uuid = %item.uuid,
                    %error,
                    "voucher issuance failed; retry with a reissue"
                );
            }
        }

        if let Err(error) = self.save_profile(order).await {
            warn!(order_uuid = %order.uuid, user_uuid = %order.user, %error, "profile snapshot failed");
        }
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.create_order",
        skip(self, order),
        fields(
            order_uuid = tracing::field::Empty,
            user_uuid = %order.user,
            total = order.total,
            items = order.items.len(),
            replayed = tracing::field::Empty
        ),
        err
    )]
    async fn create_order(&self, order: NewOrder) -> Result<CreatedOrder, OrdersServiceError> {
        if order.items.is_empty() {
            return Err(OrdersServiceError::NoItems);
        }

        let items_total = order.items_total().ok_or(OrdersServiceError::InvalidData)?;

        if items_total != order.total {
            return Err(OrdersServiceError::TotalMismatch {
                total: order.total,
                items: items_total,
            });
        }

        let mut tx = self.db.begin().await?;

        let Some(uuid) = self.repository.create_order(&mut tx, &order).await? else {
            let existing = self
                .repository
                .find_order_by_token(&mut tx, &order.idempotency_token)
                .await?;

            tx.commit().await?;

            Span::current().record("order_uuid", tracing::field::display(existing.uuid));
            Span::current().record("replayed", true);

            info!(order_uuid = %existing.uuid, "returned existing order for idempotency token");

            return Ok(CreatedOrder {
                order: existing,
                replayed: true,
            });
        };

        for (position, item) in order.items.iter().enumerate() {
            self.repository
                .create_order_item(&mut tx, uuid, position, item)
                .await?;
        }

        let consumed = self
            .repository
            .consume_pending_checkout(&mut tx, &order.idempotency_token)
            .await?;

        let record = self.repository.get_order(&mut tx, uuid).await?;

        tx.commit().await?;

        Span::current().record("order_uuid", tracing::field::display(uuid));
        Span::current().record("replayed", false);

        info!(order_uuid = %uuid, total = record.total, consumed, "created order");

        self.after_commit(&record).await;

        Ok(CreatedOrder {
            order: record,
            replayed: false,
        })
    }

    async fn get_order(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.repository.get_order(&mut tx, order).await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn find_order_by_token(&self, token: &str) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.repository.find_order_by_token(&mut tx, token).await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn list_orders(&self, user: UserUuid) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let orders = self.repository.list_orders_by_user(&mut tx, user).await?;

        tx.commit().await?;

        Ok(orders)
    }

    #[tracing::instrument(
        name = "orders.service.update_status",
        skip(self),
        fields(order_uuid = %order, to = %to, from = tracing::field::Empty),
        err
    )]
    async fn update_status(
        &self,
        order: OrderUuid,
        to: OrderStatus,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self.repository.get_order(&mut tx, order).await?;

        Span::current().record("from", tracing::field::display(current.status));

        current.status.transition(to)?;

        let Some(updated) = self
            .repository
            .update_status(&mut tx, order, current.status, to)
            .await?
        else {
            let latest = self.repository.get_order(&mut tx, order).await?;

            return Err(OrderTransitionError {
                from: latest.status,
                to,
            }
            .into());
        };

        tx.commit().await?;

        info!(order_uuid = %order, from = %current.status, to = %to, "updated order status");

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Record an order with its items in one transaction.
    ///
    /// An idempotency token that was already used returns the original order
    /// with `replayed` set and creates nothing. The pending checkout parked
    /// under the token is removed in the same transaction. New orders get
    /// vouchers for their dated experience items and refresh the user's
    /// profile once committed.
    async fn create_order(&self, order: NewOrder) -> Result<CreatedOrder, OrdersServiceError>;

    /// Get an order with its items.
    async fn get_order(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError>;

    /// The order created under an idempotency token.
    async fn find_order_by_token(&self, token: &str) -> Result<OrderRecord, OrdersServiceError>;

    /// A user's orders, newest first.
    async fn list_orders(&self, user: UserUuid) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// Move an order to `to` if its lifecycle allows it.
    async fn update_status(
        &self,
        order: OrderUuid,
        to: OrderStatus,
    ) -> Result<OrderRecord, OrdersServiceError>;
}
