//! Pending Checkouts
//!
//! Paid checkouts park their order snapshot here between payment intent
//! creation and the provider's confirmation callback.

pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::PendingCheckoutsServiceError;
pub use service::*;
