//! Pending Checkout Records

use jiff::Timestamp;

use crate::domain::orders::data::NewOrder;

/// An order waiting for its payment to be confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCheckout {
    pub payment_reference: String,
    pub order: NewOrder,
    pub created_at: Timestamp,
}
