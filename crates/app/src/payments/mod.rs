//! Payments

mod gateway;
mod webhook;

pub use gateway::*;
pub use webhook::*;
