//! Catalog Fixtures

use std::collections::BTreeMap;

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::iso::Currency;
use serde::Deserialize;

use crate::{
    catalog::{
        Addon, AddonGroup, AddonUuid, DeliveryMode, ExperienceDetails, LineKind,
        OptionDimension, PhysicalDetails, Product, ProductKind, ProductUuid, Variant, VariantUuid,
    },
    fixtures::FixtureError,
    money::{self, MoneyError},
};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Map of product slug -> product fixture
    pub products: BTreeMap<String, ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product title
    pub title: String,

    /// Product kind
    pub kind: LineKind,

    /// Base price (e.g., "325.00 EUR"); omitted for "price on request"
    #[serde(default)]
    pub price: Option<String>,

    /// Option dimensions of a physical product
    #[serde(default)]
    pub options: Vec<OptionDimension>,

    /// Variants of a physical product
    #[serde(default)]
    pub variants: Vec<VariantFixture>,

    /// Low-stock advisory threshold of a physical product
    #[serde(default)]
    pub low_stock_threshold: u32,

    /// Map of addon key -> addon fixture, experiences only
    #[serde(default)]
    pub addons: BTreeMap<String, AddonFixture>,
}

/// Variant Fixture
#[derive(Debug, Deserialize)]
pub struct VariantFixture {
    /// Stock keeping unit
    pub sku: String,

    /// Option name -> value
    pub options: BTreeMap<String, String>,

    /// Price delta (e.g., "-2.50 EUR")
    #[serde(default)]
    pub modifier: Option<String>,

    /// Units in stock
    pub stock: u32,
}

/// Addon Fixture
#[derive(Debug, Deserialize)]
pub struct AddonFixture {
    /// Display name
    pub name: String,

    /// Selection group
    pub group: AddonGroup,

    /// Price (e.g., "50.00 EUR")
    #[serde(default)]
    pub price: Option<String>,

    /// Voucher delivery mode
    #[serde(default)]
    pub delivery: Option<DeliveryMode>,
}

/// A product built from its fixture, with the keys needed to find its addons.
#[derive(Debug)]
pub struct LoadedProduct {
    /// The product
    pub product: Product,

    /// Addon fixture key -> addon UUID
    pub addon_keys: Vec<(String, AddonUuid)>,

    /// Currency of the product's prices, if it has any
    pub currency: Option<&'static Currency>,
}

impl ProductFixture {
    /// Build a catalog product keyed by `slug`
    ///
    /// # Errors
    ///
    /// Returns an error if a price cannot be parsed, if prices mix
    /// currencies, or if kind-specific data is given for the wrong kind.
    pub fn into_product(self, slug: &str) -> Result<LoadedProduct, FixtureError> {
        let mut prices = PriceReader::default();

        let base_price = self
            .price
            .as_deref()
            .map(|price| prices.unsigned(price))
            .transpose()?;

        let invalid = |reason: &str| FixtureError::InvalidProduct {
            key: slug.to_string(),
            reason: reason.to_string(),
        };

        let (kind, addon_keys) = match self.kind {
            LineKind::Physical => {
                if !self.addons.is_empty() {
                    return Err(invalid("physical products cannot have addons"));
                }

                let variants = self
                    .variants
                    .into_iter()
                    .map(|variant| {
                        Ok(Variant {
                            uuid: VariantUuid::new(),
                            sku: variant.sku,
                            options: variant.options,
                            price_modifier: variant
                                .modifier
                                .as_deref()
                                .map(|modifier| prices.signed(modifier))
                                .transpose()?
                                .unwrap_or(0),
                            stock: variant.stock,
                        })
                    })
                    .collect::<Result<Vec<_>, FixtureError>>()?;

                let details = PhysicalDetails {
                    options: self.options,
                    variants,
                    low_stock_threshold: self.low_stock_threshold,
                };

                (ProductKind::Physical(details), Vec::new())
            }
            LineKind::Experience => {
                if !self.variants.is_empty() || !self.options.is_empty() {
                    return Err(invalid("experiences cannot have variants"));
                }

                let mut addon_keys = Vec::with_capacity(self.addons.len());
                let mut addons = Vec::with_capacity(self.addons.len());

                for (key, addon) in self.addons {
                    if addon.delivery.is_some() && addon.group != AddonGroup::VoucherDelivery {
                        return Err(invalid("only voucher_delivery addons have a delivery mode"));
                    }

                    let uuid = AddonUuid::new();

                    addons.push(Addon {
                        uuid,
                        name: addon.name,
                        group: addon.group,
                        price: addon
                            .price
                            .as_deref()
                            .map(|price| prices.unsigned(price))
                            .transpose()?,
                        delivery: addon.delivery,
                    });

                    addon_keys.push((key, uuid));
                }

                (
                    ProductKind::Experience(ExperienceDetails { addons }),
                    addon_keys,
                )
            }
        };

        Ok(LoadedProduct {
            product: Product {
                uuid: ProductUuid::new(),
                slug: slug.to_string(),
                title: self.title,
                base_price,
                kind,
            },
            addon_keys,
            currency: prices.currency,
        })
    }
}

/// Parses prices while checking they share one currency.
#[derive(Debug, Default)]
struct PriceReader {
    currency: Option<&'static Currency>,
}

impl PriceReader {
    fn signed(&mut self, price: &str) -> Result<i64, FixtureError> {
        let (minor_units, currency) = parse_price(price)?;

        match self.currency {
            Some(existing) if existing != currency => {
                return Err(FixtureError::CurrencyMismatch(
                    existing.iso_alpha_code.to_string(),
                    currency.iso_alpha_code.to_string(),
                ));
            }
            Some(_) => {}
            None => self.currency = Some(currency),
        }

        Ok(minor_units)
    }

    fn unsigned(&mut self, price: &str) -> Result<u64, FixtureError> {
        let minor_units = self.signed(price)?;

        u64::try_from(minor_units).map_err(|_err| FixtureError::InvalidPrice(price.to_string()))
    }
}

/// Parse price string (e.g., "2.99 EUR") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount is not a decimal number, or if the currency code is not
/// recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let minor_units = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = money::currency(code).map_err(|error| match error {
        MoneyError::UnknownCurrency(code) => FixtureError::UnknownCurrency(code),
        MoneyError::OutOfRange(_) => FixtureError::InvalidPrice(s.to_string()),
    })?;

    Ok((minor_units, currency))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::EUR;

    use super::*;

    #[test]
    fn parse_price_rejects_invalid_format() {
        let result = parse_price("2.99EUR");

        assert!(matches!(result, Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_rejects_unknown_currency() {
        let result = parse_price("2.99 ABC");

        assert!(matches!(result, Err(FixtureError::UnknownCurrency(code)) if code == "ABC"));
    }

    #[test]
    fn parse_price_accepts_negative_modifier() -> Result<(), FixtureError> {
        let (minor, currency) = parse_price("-2.50 EUR")?;

        assert_eq!(minor, -250);
        assert_eq!(currency, EUR);

        Ok(())
    }

    #[test]
    fn negative_base_price_is_rejected() {
        let fixture = ProductFixture {
            title: "Sticker".to_string(),
            kind: LineKind::Physical,
            price: Some("-1.00 EUR".to_string()),
            options: Vec::new(),
            variants: Vec::new(),
            low_stock_threshold: 0,
            addons: BTreeMap::new(),
        };

        let result = fixture.into_product("sticker").map(|loaded| loaded.product.uuid);

        assert!(matches!(result, Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn physical_product_with_addons_is_rejected() {
        let fixture = ProductFixture {
            title: "Cap".to_string(),
            kind: LineKind::Physical,
            price: Some("15.00 EUR".to_string()),
            options: Vec::new(),
            variants: Vec::new(),
            low_stock_threshold: 0,
            addons: BTreeMap::from([(
                "gopro".to_string(),
                AddonFixture {
                    name: "GoPro".to_string(),
                    group: AddonGroup::Standard,
                    price: None,
                    delivery: None,
                },
            )]),
        };

        let result = fixture.into_product("cap").map(|loaded| loaded.product.uuid);

        assert!(matches!(result, Err(FixtureError::InvalidProduct { key, .. }) if key == "cap"));
    }
}
