//! Profile Handlers

pub(crate) mod get;
