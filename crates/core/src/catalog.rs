//! Catalog
//!
//! Read-only view of the products a customer can put in a cart. The catalog is
//! the pricing resolver's only data source.

use std::{collections::BTreeMap, fmt, str::FromStr};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<Product>;

/// Variant UUID
pub type VariantUuid = TypedUuid<Variant>;

/// Addon UUID
pub type AddonUuid = TypedUuid<Addon>;

/// Raised when a stored enum discriminator is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownValue {
    /// What was being parsed.
    pub kind: &'static str,

    /// The offending value.
    pub value: String,
}

/// A purchasable product.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Product identity.
    pub uuid: ProductUuid,

    /// URL slug, also snapshotted onto vouchers.
    pub slug: String,

    /// Display title.
    pub title: String,

    /// Base price in minor units. `None` means "price on request".
    pub base_price: Option<u64>,

    /// Kind-specific details.
    pub kind: ProductKind,
}

impl Product {
    /// The discriminator for this product's kind.
    pub fn line_kind(&self) -> LineKind {
        match self.kind {
            ProductKind::Physical(_) => LineKind::Physical,
            ProductKind::Experience(_) => LineKind::Experience,
        }
    }

    /// Look up an addon of an experience product.
    pub fn addon(&self, uuid: AddonUuid) -> Option<&Addon> {
        match &self.kind {
            ProductKind::Experience(details) => {
                details.addons.iter().find(|addon| addon.uuid == uuid)
            }
            ProductKind::Physical(_) => None,
        }
    }
}

/// Kind-specific product data.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductKind {
    /// Shippable goods with option dimensions and stocked variants.
    Physical(PhysicalDetails),

    /// A bookable experience configured through addons.
    Experience(ExperienceDetails),
}

/// Physical product details.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PhysicalDetails {
    /// Declared option dimensions, e.g. `size` and `color`.
    pub options: Vec<OptionDimension>,

    /// Purchasable option combinations.
    pub variants: Vec<Variant>,

    /// Stock level below which a low-stock advisory is raised.
    pub low_stock_threshold: u32,
}

impl PhysicalDetails {
    /// Find the variant whose option values equal `selected` exactly.
    pub fn match_variant(&self, selected: &BTreeMap<String, String>) -> Option<&Variant> {
        self.variants
            .iter()
            .find(|variant| &variant.options == selected)
    }
}

/// An option dimension of a physical product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDimension {
    /// Dimension name.
    pub name: String,

    /// Allowed values.
    pub values: Vec<String>,
}

/// A concrete option combination with its own stock and price delta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    /// Variant identity.
    pub uuid: VariantUuid,

    /// Stock keeping unit.
    pub sku: String,

    /// Option name to value.
    pub options: BTreeMap<String, String>,

    /// Price delta in minor units, may be negative.
    pub price_modifier: i64,

    /// Units in stock.
    pub stock: u32,
}

impl Variant {
    /// Human readable description such as `size: M, color: black`.
    pub fn description(&self) -> String {
        self.options
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Experience product details.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExperienceDetails {
    /// Addons offered for this experience.
    pub addons: Vec<Addon>,
}

/// A modifier attached to an experience line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Addon {
    /// Addon identity.
    pub uuid: AddonUuid,

    /// Display name, snapshotted onto order items and vouchers.
    pub name: String,

    /// The selection group this addon belongs to.
    pub group: AddonGroup,

    /// Price in minor units, `None` for free addons.
    pub price: Option<u64>,

    /// Voucher delivery mode, only meaningful for [`AddonGroup::VoucherDelivery`].
    pub delivery: Option<DeliveryMode>,
}

/// Addon selection group.
///
/// Every group except [`AddonGroup::Standard`] is mutually exclusive: a line
/// holds at most one member of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddonGroup {
    /// Multi-select extras.
    Standard,

    /// Venue choice.
    Location,

    /// Session length choice.
    Duration,

    /// How the voucher reaches the customer.
    VoucherDelivery,
}

impl AddonGroup {
    /// Whether at most one member of this group may be selected.
    pub const fn is_exclusive(self) -> bool {
        !matches!(self, Self::Standard)
    }

    /// Whether selected members of this group contribute to the price.
    pub const fn is_priced(self) -> bool {
        !matches!(self, Self::Location)
    }

    /// Storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Location => "location",
            Self::Duration => "duration",
            Self::VoucherDelivery => "voucher_delivery",
        }
    }
}

impl FromStr for AddonGroup {
    type Err = UnknownValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "standard" => Ok(Self::Standard),
            "location" => Ok(Self::Location),
            "duration" => Ok(Self::Duration),
            "voucher_delivery" => Ok(Self::VoucherDelivery),
            other => Err(UnknownValue {
                kind: "addon group",
                value: other.to_string(),
            }),
        }
    }
}

/// How a voucher is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    /// Emailed PDF.
    Digital,

    /// Printed and posted, needs a shipping address.
    Physical,
}

impl DeliveryMode {
    /// Storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Digital => "digital",
            Self::Physical => "physical",
        }
    }
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliveryMode {
    type Err = UnknownValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "digital" => Ok(Self::Digital),
            "physical" => Ok(Self::Physical),
            other => Err(UnknownValue {
                kind: "delivery mode",
                value: other.to_string(),
            }),
        }
    }
}

/// Cart line and order item kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// Shippable goods.
    Physical,

    /// Bookable experience.
    Experience,
}

impl LineKind {
    /// Storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Physical => "physical",
            Self::Experience => "experience",
        }
    }
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LineKind {
    type Err = UnknownValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "physical" => Ok(Self::Physical),
            "experience" => Ok(Self::Experience),
            other => Err(UnknownValue {
                kind: "line kind",
                value: other.to_string(),
            }),
        }
    }
}

/// Anything that can resolve a product by identity.
pub trait ProductLookup {
    /// Returns the product with the given UUID, if known.
    fn product(&self, uuid: ProductUuid) -> Option<&Product>;
}

/// An in-memory catalog snapshot.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: FxHashMap<ProductUuid, Product>,
}

impl Catalog {
    /// Build a snapshot from a list of products.
    pub fn new(products: impl IntoIterator<Item = Product>) -> Self {
        Self {
            products: products
                .into_iter()
                .map(|product| (product.uuid, product))
                .collect(),
        }
    }

    /// Add or replace a product.
    pub fn insert(&mut self, product: Product) {
        self.products.insert(product.uuid, product);
    }

    /// Find a product by slug.
    pub fn by_slug(&self, slug: &str) -> Option<&Product> {
        self.products.values().find(|product| product.slug == slug)
    }

    /// Iterate over all products.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog holds no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl ProductLookup for Catalog {
    fn product(&self, uuid: ProductUuid) -> Option<&Product> {
        self.products.get(&uuid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exclusive_groups() {
        assert!(!AddonGroup::Standard.is_exclusive());
        assert!(AddonGroup::Location.is_exclusive());
        assert!(AddonGroup::Duration.is_exclusive());
        assert!(AddonGroup::VoucherDelivery.is_exclusive());
    }

    #[test]
    fn group_round_trips_through_storage_string() {
        for group in [
            AddonGroup::Standard,
            AddonGroup::Location,
            AddonGroup::Duration,
            AddonGroup::VoucherDelivery,
        ] {
            assert_eq!(group.as_str().parse::<AddonGroup>(), Ok(group));
        }
    }

    #[test]
    fn unknown_delivery_mode_is_rejected() {
        let result = "pigeon".parse::<DeliveryMode>();

        assert!(
            matches!(result, Err(UnknownValue { kind: "delivery mode", .. })),
            "expected UnknownValue, got {result:?}"
        );
    }

    #[test]
    fn variant_description_lists_options_in_name_order() {
        let variant = Variant {
            uuid: VariantUuid::new(),
            sku: "TEE-M-BLK".to_string(),
            options: BTreeMap::from([
                ("size".to_string(), "M".to_string()),
                ("color".to_string(), "black".to_string()),
            ]),
            price_modifier: 0,
            stock: 3,
        };

        assert_eq!(variant.description(), "color: black, size: M");
    }
}
