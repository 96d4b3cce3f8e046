//! Voucher payloads

use driftworks_app::domain::vouchers::records::VoucherRecord;
use jiff::civil::Date;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Voucher Response
///
/// Everything needed to verify a voucher at the track.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct VoucherResponse {
    /// The unique identifier of the voucher
    pub uuid: Uuid,

    /// Order the voucher was issued for
    pub order_uuid: Uuid,

    /// Order item the voucher was issued for
    pub order_item_uuid: Uuid,

    /// Product slug
    pub product_slug: String,

    /// Product title
    pub product_title: String,

    /// Experience date
    pub date: Option<String>,

    /// Last day the voucher can be redeemed
    pub expiry_date: Option<String>,

    /// Selected addon names
    pub addons: Vec<String>,

    /// Name printed on the voucher
    pub recipient_name: Option<String>,

    /// Experience location
    pub location: Option<String>,

    /// Voucher delivery mode
    pub delivery: Option<String>,

    /// Customer name
    pub customer_name: String,

    /// Customer e-mail
    pub customer_email: String,

    /// `pending`, `active`, `redeemed` or `expired`
    pub status: String,

    /// When the voucher was redeemed
    pub redeemed_at: Option<String>,

    /// When the voucher was issued
    pub created_at: String,
}

impl VoucherResponse {
    /// Render `voucher` with its status as of `today`.
    pub(crate) fn new(voucher: VoucherRecord, today: Date) -> Self {
        let status = voucher.display_status(today).as_str().to_string();

        Self {
            uuid: voucher.uuid.into_uuid(),
            order_uuid: voucher.order.into_uuid(),
            order_item_uuid: voucher.order_item.into_uuid(),
            product_slug: voucher.product_slug,
            product_title: voucher.product_title,
            date: voucher.date.map(|date| date.to_string()),
            expiry_date: voucher.expiry_date.map(|date| date.to_string()),
            addons: voucher.addons,
            recipient_name: voucher.recipient_name,
            location: voucher.location,
            delivery: voucher.delivery.map(|mode| mode.as_str().to_string()),
            customer_name: voucher.customer_name,
            customer_email: voucher.customer_email,
            status,
            redeemed_at: voucher.redeemed_at.map(|at| at.to_string()),
            created_at: voucher.created_at.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use driftworks::vouchers::VoucherStatus;
    use jiff::civil::date;

    use driftworks_app::auth::UserUuid;

    use crate::test_helpers::voucher_record;

    use super::*;

    #[test]
    fn active_voucher_expires_after_its_expiry_day() {
        let voucher = voucher_record(UserUuid::new(), VoucherStatus::Active);

        let on_expiry = VoucherResponse::new(voucher.clone(), date(2026, 6, 1));
        let after_expiry = VoucherResponse::new(voucher, date(2026, 6, 2));

        assert_eq!(on_expiry.status, "active");
        assert_eq!(after_expiry.status, "expired");
        assert_eq!(after_expiry.expiry_date.as_deref(), Some("2026-06-01"));
    }

    #[test]
    fn redeemed_outranks_expired() {
        let voucher = voucher_record(UserUuid::new(), VoucherStatus::Redeemed);

        assert_eq!(VoucherResponse::new(voucher, date(2027, 1, 1)).status, "redeemed");
    }
}
