//! Profile Records

use driftworks::checkout::{Contact, ShippingAddress};
use jiff::Timestamp;

use crate::auth::UserUuid;

/// Contact and shipping details from a user's latest order, used to prefill
/// the next checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRecord {
    pub user: UserUuid,
    pub contact: Contact,
    pub shipping: Option<ShippingAddress>,
    pub updated_at: Timestamp,
}

/// Profile Snapshot
///
/// A missing shipping address keeps the one already stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSnapshot {
    pub user: UserUuid,
    pub contact: Contact,
    pub shipping: Option<ShippingAddress>,
}
