//! Vouchers

pub mod errors;
pub(crate) mod issuer;
pub mod records;
mod repository;
pub mod service;

pub use errors::VouchersServiceError;
pub use service::*;
