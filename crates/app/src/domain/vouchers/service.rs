//! Vouchers service.

use async_trait::async_trait;
use driftworks::vouchers::{ValidityWindow, VoucherStateError, VoucherStatus, today};
use jiff::{Timestamp, civil::Date};
use mockall::automock;
use tracing::{Span, info};

use crate::{
    auth::UserUuid,
    database::Db,
    domain::{
        orders::records::{OrderItemUuid, OrderUuid},
        vouchers::{
            VouchersServiceError,
            issuer::VoucherIssuer,
            records::{IssuedVoucher, VoucherRecord, VoucherUuid},
            repository::PgVouchersRepository,
        },
    },
};

/// Who is fixing an experience date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateEditor {
    /// The customer who placed the order; other customers' items are
    /// reported as not found.
    Owner(UserUuid),

    /// Staff may edit any order's items.
    Staff,
}

impl DateEditor {
    fn may_edit(self, owner: UserUuid) -> bool {
        match self {
            Self::Owner(user) => user == owner,
            Self::Staff => true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PgVouchersService {
    db: Db,
    repository: PgVouchersRepository,
    issuer: VoucherIssuer,
}

impl PgVouchersService {
    #[must_use]
    pub fn new(db: Db, validity: ValidityWindow) -> Self {
        Self {
            db,
            repository: PgVouchersRepository::new(),
            issuer: VoucherIssuer::new(validity),
        }
    }
}

#[async_trait]
impl VouchersService for PgVouchersService {
    #[tracing::instrument(
        name = "vouchers.service.issue_voucher",
        skip(self),
        fields(order_item_uuid = %item, voucher_uuid = tracing::field::Empty),
        err
    )]
    async fn issue_voucher(&self, item: OrderItemUuid) -> Result<IssuedVoucher, VouchersServiceError> {
        let mut tx = self.db.begin().await?;

        let issued = self.issuer.issue_in(&mut tx, item).await?;

        tx.commit().await?;

        Span::current().record("voucher_uuid", tracing::field::display(issued.voucher.uuid));

        if issued.created {
            info!(voucher_uuid = %issued.voucher.uuid, "issued voucher");
        }

        Ok(issued)
    }

    #[tracing::instrument(
        name = "vouchers.service.confirm_date",
        skip(self),
        fields(
            editor = ?editor,
            order_uuid = %order,
            order_item_uuid = %item,
            confirm_only = date.is_none(),
            voucher_uuid = tracing::field::Empty
        ),
        err
    )]
    async fn confirm_date(
        &self,
        editor: DateEditor,
        order: OrderUuid,
        item: OrderItemUuid,
        date: Option<Date>,
    ) -> Result<VoucherRecord, VouchersServiceError> {
        if let Some(date) = date
            && date < today(Timestamp::now())
        {
            return Err(VouchersServiceError::DateInPast);
        }

        let mut tx = self.db.begin().await?;

        let source = self.repository.get_issuance_source(&mut tx, item).await?;

        if source.order != order || !editor.may_edit(source.user) {
            return Err(VouchersServiceError::NotFound);
        }

        let date = match date {
            Some(date) => {
                self.repository.set_item_date(&mut tx, item, date).await?;
                date
            }
            None => source.date.ok_or(VouchersServiceError::NoDate)?,
        };

        let existing = self.repository.find_voucher_by_item(&mut tx, item).await?;

        let voucher = match existing {
            Some(voucher) if voucher.status == VoucherStatus::Redeemed => {
                return Err(VoucherStateError::AlreadyRedeemed.into());
            }
            Some(voucher) => {
                let expiry_date = self
                    .issuer
                    .validity()
                    .expiry_for(date)
                    .map_err(VouchersServiceError::InvalidDate)?;

                self.repository
                    .set_voucher_date(&mut tx, voucher.uuid, date, expiry_date)
                    .await?
                    .ok_or(VoucherStateError::AlreadyRedeemed)?
            }
            None => self.issuer.issue_in(&mut tx, item).await?.voucher,
        };

        tx.commit().await?;

        Span::current().record("voucher_uuid", tracing::field::display(voucher.uuid));

        info!(voucher_uuid = %voucher.uuid, date = %date, "confirmed voucher date");

        Ok(voucher)
    }

    async fn get_voucher(&self, voucher: VoucherUuid) -> Result<VoucherRecord, VouchersServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.repository.get_voucher(&mut tx, voucher).await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn list_vouchers(&self, user: UserUuid) -> Result<Vec<VoucherRecord>, VouchersServiceError> {
        let mut tx = self.db.begin().await?;

        let records = self.repository.list_vouchers_by_user(&mut tx, user).await?;

        tx.commit().await?;

        Ok(records)
    }

    #[tracing::instrument(
        name = "vouchers.service.redeem",
        skip(self, now),
        fields(voucher_uuid = %voucher, display_status = tracing::field::Empty),
        err
    )]
    async fn redeem(
        &self,
        voucher: VoucherUuid,
        now: Timestamp,
    ) -> Result<VoucherRecord, VouchersServiceError> {
        let today = today(now);

        let mut tx = self.db.begin().await?;

        let current = self.repository.get_voucher(&mut tx, voucher).await?;

        let status = current.display_status(today);

        Span::current().record("display_status", tracing::field::display(status));

        status.ensure_redeemable()?;

        let Some(redeemed) = self
            .repository
            .redeem_voucher(&mut tx, voucher, now, today)
            .await?
        else {
            // Lost a race with another scan; report what the winner left behind.
            let latest = self.repository.get_voucher(&mut tx, voucher).await?;

            latest.display_status(today).ensure_redeemable()?;

            return Err(VoucherStateError::AlreadyRedeemed.into());
        };

        tx.commit().await?;

        info!(voucher_uuid = %redeemed.uuid, "redeemed voucher");

        Ok(redeemed)
    }

    #[tracing::instrument(
        name = "vouchers.service.issue_missing",
        skip(self),
        fields(order_uuid = %order, issued = tracing::field::Empty),
        err
    )]
    async fn issue_missing(&self, order: OrderUuid) -> Result<Vec<IssuedVoucher>, VouchersServiceError> {
        let mut tx = self.db.begin().await?;

        let items = self
            .repository
            .list_dated_experience_items(&mut tx, order)
            .await?;

        tx.commit().await?;

        let mut issued = Vec::with_capacity(items.len());

        for item in items {
            let mut tx = self.db.begin().await?;

            let voucher = self.issuer.issue_in(&mut tx, item).await?;

            tx.commit().await?;

            if voucher.created {
                info!(voucher_uuid = %voucher.voucher.uuid, order_item_uuid = %item, "issued missing voucher");

                issued.push(voucher);
            }
        }

        Span::current().record("issued", issued.len());

        Ok(issued)
    }
}

#[automock]
#[async_trait]
pub trait VouchersService: Send + Sync {
    /// Mint the voucher for an experience order item, or return the one it
    /// already has.
    async fn issue_voucher(&self, item: OrderItemUuid) -> Result<IssuedVoucher, VouchersServiceError>;

    /// Confirm the experience date of an order item on behalf of `editor`.
    ///
    /// With `date` set the item's date is overwritten; with `None` the
    /// existing date is accepted as final. Issues the voucher if the item has
    /// none yet.
    async fn confirm_date(
        &self,
        editor: DateEditor,
        order: OrderUuid,
        item: OrderItemUuid,
        date: Option<Date>,
    ) -> Result<VoucherRecord, VouchersServiceError>;

    /// Verification snapshot of a voucher.
    async fn get_voucher(&self, voucher: VoucherUuid) -> Result<VoucherRecord, VouchersServiceError>;

    /// A user's vouchers, newest first.
    async fn list_vouchers(&self, user: UserUuid) -> Result<Vec<VoucherRecord>, VouchersServiceError>;

    /// Redeem a voucher exactly once.
    async fn redeem(
        &self,
        voucher: VoucherUuid,
        now: Timestamp,
    ) -> Result<VoucherRecord, VouchersServiceError>;

    /// Issue vouchers for dated experience items of an order that have none.
    /// Returns only the vouchers created by this call.
    async fn issue_missing(&self, order: OrderUuid) -> Result<Vec<IssuedVoucher>, VouchersServiceError>;
}
