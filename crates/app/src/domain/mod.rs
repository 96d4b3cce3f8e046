//! Driftworks Domain Concerns

pub mod catalog;
pub mod checkouts;
pub mod orders;
pub mod profiles;
pub mod vouchers;

pub(crate) mod columns;
pub(crate) mod storage;
