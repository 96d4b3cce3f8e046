//! Cart Handlers

pub(crate) mod quote;
