//! Catalog Records
//!
//! Rows of the catalog tables. The service assembles them into
//! [`driftworks::catalog::Product`] values.

use driftworks::catalog::{Addon, LineKind, OptionDimension, ProductUuid, Variant};

/// Product header row.
#[derive(Debug, Clone)]
pub struct ProductRow {
    pub uuid: ProductUuid,
    pub slug: String,
    pub title: String,
    pub kind: LineKind,
    pub base_price: Option<u64>,
    pub low_stock_threshold: u32,
}

/// Option dimension row.
#[derive(Debug, Clone)]
pub struct OptionRow {
    pub product: ProductUuid,
    pub option: OptionDimension,
}

/// Variant row.
#[derive(Debug, Clone)]
pub struct VariantRow {
    pub product: ProductUuid,
    pub variant: Variant,
}

/// Addon row.
#[derive(Debug, Clone)]
pub struct AddonRow {
    pub product: ProductUuid,
    pub addon: Addon,
}
