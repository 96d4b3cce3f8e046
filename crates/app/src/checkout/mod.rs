//! Checkout
//!
//! Turns a client-held cart into an order: re-prices every line against the
//! catalog, validates contact and shipping, then either reserves a payment or
//! records a free order straight away.

mod errors;
mod request;
mod service;

pub use errors::*;
pub use request::*;
pub use service::*;
