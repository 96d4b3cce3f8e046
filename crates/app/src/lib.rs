//! Persistence, services and integrations for the Driftworks shop.

pub mod auth;
pub mod checkout;
pub mod context;
pub mod database;
pub mod domain;
pub mod payments;

#[cfg(test)]
mod test;
