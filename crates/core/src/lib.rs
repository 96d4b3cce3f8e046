//! Driftworks
//!
//! Pricing, cart and lifecycle rules for a drift-experience shop. Everything in
//! this crate is pure: catalog data and the current time are passed in, and no
//! I/O is performed.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod fixtures;
pub mod money;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod selection;
pub mod uuids;
pub mod vouchers;
