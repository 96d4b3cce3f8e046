//! Voucher Records

use driftworks::{
    catalog::{DeliveryMode, LineKind},
    uuids::TypedUuid,
    vouchers::{DisplayStatus, VoucherStatus},
};
use jiff::{Timestamp, civil::Date};

use crate::{
    auth::UserUuid,
    domain::orders::records::{OrderItemUuid, OrderUuid},
};

/// Voucher UUID. Generated with [`TypedUuid::random`]; holding it is enough to
/// redeem the voucher.
pub type VoucherUuid = TypedUuid<VoucherRecord>;

/// Voucher Record
///
/// Carries everything staff need to verify a voucher without looking at the
/// catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoucherRecord {
    pub uuid: VoucherUuid,
    pub order: OrderUuid,
    pub order_item: OrderItemUuid,
    pub user: UserUuid,
    pub product_slug: String,
    pub product_title: String,
    pub date: Option<Date>,
    pub expiry_date: Option<Date>,
    pub addons: Vec<String>,
    pub recipient_name: Option<String>,
    pub location: Option<String>,
    pub delivery: Option<DeliveryMode>,
    pub customer_name: String,
    pub customer_email: String,
    pub status: VoucherStatus,
    pub redeemed_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl VoucherRecord {
    /// Status as of `today`.
    pub fn display_status(&self, today: Date) -> DisplayStatus {
        DisplayStatus::derive(self.status, self.expiry_date, today)
    }
}

/// The order item and order data a voucher is minted from.
#[derive(Debug, Clone)]
pub(crate) struct IssuanceSource {
    pub order: OrderUuid,
    pub order_item: OrderItemUuid,
    pub user: UserUuid,
    pub kind: LineKind,
    pub product_slug: String,
    pub product_title: String,
    pub date: Option<Date>,
    pub addons: Vec<String>,
    pub recipient_name: Option<String>,
    pub location: Option<String>,
    pub delivery: Option<DeliveryMode>,
    pub customer_name: String,
    pub customer_email: String,
}

/// New Voucher Data
#[derive(Debug, Clone)]
pub(crate) struct NewVoucher {
    pub uuid: VoucherUuid,
    pub source: IssuanceSource,
    pub expiry_date: Option<Date>,
    pub status: VoucherStatus,
}

/// A voucher returned by issuance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedVoucher {
    pub voucher: VoucherRecord,

    /// `false` when the item already had a voucher.
    pub created: bool,
}
