//! Voucher issuance shared by order creation, date confirmation and
//! issuance retries.

use driftworks::{
    catalog::LineKind,
    vouchers::{ValidityWindow, VoucherStatus},
};
use sqlx::{Postgres, Transaction};

use crate::domain::{
    orders::records::OrderItemUuid,
    vouchers::{
        VouchersServiceError,
        records::{IssuedVoucher, NewVoucher, VoucherUuid},
        repository::PgVouchersRepository,
    },
};

#[derive(Debug, Clone, Default)]
pub(crate) struct VoucherIssuer {
    repository: PgVouchersRepository,
    validity: ValidityWindow,
}

impl VoucherIssuer {
    pub(crate) fn new(validity: ValidityWindow) -> Self {
        Self {
            repository: PgVouchersRepository::new(),
            validity,
        }
    }

    pub(crate) fn validity(&self) -> ValidityWindow {
        self.validity
    }

    /// Mint the voucher for an experience order item inside `tx`. An item
    /// that already has a voucher gets it back unchanged.
    pub(crate) async fn issue_in(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: OrderItemUuid,
    ) -> Result<IssuedVoucher, VouchersServiceError> {
        let source = self.repository.get_issuance_source(tx, item).await?;

        if source.kind != LineKind::Experience {
            return Err(VouchersServiceError::NotAnExperience);
        }

        let expiry_date = source
            .date
            .map(|date| self.validity.expiry_for(date))
            .transpose()
            .map_err(VouchersServiceError::InvalidDate)?;

        let voucher = NewVoucher {
            uuid: VoucherUuid::random(),
            status: VoucherStatus::initial(source.date),
            expiry_date,
            source,
        };

        if let Some(created) = self.repository.create_voucher(tx, &voucher).await? {
            return Ok(IssuedVoucher {
                voucher: created,
                created: true,
            });
        }

        let existing = self
            .repository
            .find_voucher_by_item(tx, item)
            .await?
            .ok_or(VouchersServiceError::NotFound)?;

        Ok(IssuedVoucher {
            voucher: existing,
            created: false,
        })
    }
}
