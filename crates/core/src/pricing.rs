//! Pricing
//!
//! Resolves the authoritative unit price of a cart line from the catalog and
//! the line's selection. Client supplied prices never enter this module.

use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    catalog::{
        AddonUuid, DeliveryMode, ExperienceDetails, LineKind, PhysicalDetails, Product,
        ProductKind, VariantUuid,
    },
    selection::{ExperienceSelection, LineSelection, PhysicalSelection},
};

/// Errors that prevent a line from being priced.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// The selection payload does not match the product kind.
    #[error("{selection} selection given for a {product} product")]
    KindMismatch {
        /// Kind of the product.
        product: LineKind,
        /// Kind of the selection.
        selection: LineKind,
    },

    /// Not every option dimension has a value, or the values match no variant.
    #[error("selection is incomplete; missing options: {missing:?}")]
    IncompleteSelection {
        /// Option dimensions without a value. Empty when every dimension has a
        /// value but the combination is not sold.
        missing: Vec<String>,
    },

    /// The matched variant cannot cover the requested quantity.
    #[error("variant {sku} is out of stock ({available} available, {requested} requested)")]
    OutOfStock {
        /// SKU of the matched variant.
        sku: String,
        /// Units in stock.
        available: u32,
        /// Units requested.
        requested: u32,
    },

    /// A selected addon is not offered for this product.
    #[error("addon {0} is not offered for this product")]
    UnknownAddon(AddonUuid),

    /// The computed price is negative or overflows.
    #[error("computed price is out of range")]
    PriceOutOfRange,
}

/// Non-fatal notices raised while pricing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    /// Stock is above zero but below the product's low-stock threshold.
    LowStock {
        /// SKU of the matched variant.
        sku: String,
        /// Units left.
        remaining: u32,
    },

    /// The product has no base price; only addons were charged.
    PriceOnRequest,
}

/// The variant a physical selection resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVariant {
    /// Variant identity.
    pub uuid: VariantUuid,

    /// Stock keeping unit.
    pub sku: String,

    /// Human readable option summary.
    pub description: String,

    /// Units in stock at resolution time.
    pub stock: u32,
}

/// Result of pricing a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceResolution {
    /// Unit price in minor units.
    pub unit_price: u64,

    /// Matched variant, physical lines only.
    pub variant: Option<ResolvedVariant>,

    /// Whether fulfilling this line needs a shipping address.
    pub requires_shipping: bool,

    /// Non-fatal notices.
    pub advisories: SmallVec<[Advisory; 1]>,
}

/// Resolve the unit price for a product and selection.
///
/// # Errors
///
/// - [`PricingError::KindMismatch`]: selection and product kinds differ.
/// - [`PricingError::IncompleteSelection`]: a physical selection matches no variant.
/// - [`PricingError::OutOfStock`]: the matched variant has no stock.
/// - [`PricingError::UnknownAddon`]: an experience selection names a foreign addon.
/// - [`PricingError::PriceOutOfRange`]: arithmetic overflow or a negative total.
pub fn resolve_price(
    product: &Product,
    selection: &LineSelection,
) -> Result<PriceResolution, PricingError> {
    match (&product.kind, selection) {
        (ProductKind::Physical(details), LineSelection::Physical(selection)) => {
            resolve_physical(product.base_price, details, selection)
        }
        (ProductKind::Experience(details), LineSelection::Experience(selection)) => {
            resolve_experience(product.base_price, details, selection)
        }
        _ => Err(PricingError::KindMismatch {
            product: product.line_kind(),
            selection: selection.kind(),
        }),
    }
}

/// Resolve the unit price and check that `quantity` units can be supplied.
///
/// # Errors
///
/// Everything [`resolve_price`] returns, plus [`PricingError::OutOfStock`]
/// when the matched variant holds fewer than `quantity` units.
pub fn resolve_line(
    product: &Product,
    selection: &LineSelection,
    quantity: u32,
) -> Result<PriceResolution, PricingError> {
    let resolution = resolve_price(product, selection)?;

    if let Some(variant) = &resolution.variant
        && variant.stock < quantity
    {
        return Err(PricingError::OutOfStock {
            sku: variant.sku.clone(),
            available: variant.stock,
            requested: quantity,
        });
    }

    Ok(resolution)
}

fn resolve_physical(
    base_price: Option<u64>,
    details: &PhysicalDetails,
    selection: &PhysicalSelection,
) -> Result<PriceResolution, PricingError> {
    let missing: Vec<String> = details
        .options
        .iter()
        .filter(|dimension| !selection.options.contains_key(&dimension.name))
        .map(|dimension| dimension.name.clone())
        .collect();

    if !missing.is_empty() {
        return Err(PricingError::IncompleteSelection { missing });
    }

    let variant = details
        .match_variant(&selection.options)
        .ok_or(PricingError::IncompleteSelection { missing })?;

    if variant.stock == 0 {
        return Err(PricingError::OutOfStock {
            sku: variant.sku.clone(),
            available: 0,
            requested: 1,
        });
    }

    let mut advisories = SmallVec::new();

    if variant.stock < details.low_stock_threshold {
        advisories.push(Advisory::LowStock {
            sku: variant.sku.clone(),
            remaining: variant.stock,
        });
    }

    let base =
        i64::try_from(base_price.unwrap_or(0)).map_err(|_err| PricingError::PriceOutOfRange)?;

    let unit_price = base
        .checked_add(variant.price_modifier)
        .and_then(|price| u64::try_from(price).ok())
        .ok_or(PricingError::PriceOutOfRange)?;

    Ok(PriceResolution {
        unit_price,
        variant: Some(ResolvedVariant {
            uuid: variant.uuid,
            sku: variant.sku.clone(),
            description: variant.description(),
            stock: variant.stock,
        }),
        requires_shipping: true,
        advisories,
    })
}

fn resolve_experience(
    base_price: Option<u64>,
    details: &ExperienceDetails,
    selection: &ExperienceSelection,
) -> Result<PriceResolution, PricingError> {
    let mut advisories = SmallVec::new();

    if base_price.is_none() {
        advisories.push(Advisory::PriceOnRequest);
    }

    let mut unit_price = base_price.unwrap_or(0);
    let mut requires_shipping = false;

    for uuid in selection.addon_ids() {
        let addon = details
            .addons
            .iter()
            .find(|addon| addon.uuid == uuid)
            .ok_or(PricingError::UnknownAddon(uuid))?;

        if addon.group.is_priced()
            && let Some(price) = addon.price
        {
            unit_price = unit_price
                .checked_add(price)
                .ok_or(PricingError::PriceOutOfRange)?;
        }

        if addon.delivery == Some(DeliveryMode::Physical) {
            requires_shipping = true;
        }
    }

    Ok(PriceResolution {
        unit_price,
        variant: None,
        requires_shipping,
        advisories,
    })
}
