//! Product payloads

use std::collections::BTreeMap;

use driftworks::catalog::{Addon, OptionDimension, Product, ProductKind, Variant};
use rusty_money::iso::Currency;
use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{extensions::*, money::MoneyResponse};

/// Product Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductResponse {
    /// The unique identifier of the product
    pub uuid: Uuid,

    /// URL slug
    pub slug: String,

    /// Display title
    pub title: String,

    /// `physical` or `experience`
    pub kind: String,

    /// Base price. Absent when the price is given on request.
    pub price: Option<MoneyResponse>,

    /// Option dimensions of a physical product
    pub options: Vec<OptionResponse>,

    /// Purchasable variants of a physical product
    pub variants: Vec<VariantResponse>,

    /// Addons of an experience
    pub addons: Vec<AddonResponse>,
}

impl ProductResponse {
    pub(crate) fn new(product: Product, currency: &'static Currency) -> Result<Self, StatusError> {
        let price = product
            .base_price
            .map(|price| MoneyResponse::new(price, currency))
            .transpose()?;

        let kind = product.line_kind().as_str().to_string();

        let (options, variants, addons) = match product.kind {
            ProductKind::Physical(details) => (
                details.options.into_iter().map(OptionResponse::from).collect(),
                details
                    .variants
                    .into_iter()
                    .map(|variant| VariantResponse::new(variant, product.base_price, currency))
                    .collect::<Result<Vec<_>, _>>()?,
                Vec::new(),
            ),
            ProductKind::Experience(details) => (
                Vec::new(),
                Vec::new(),
                details
                    .addons
                    .into_iter()
                    .map(|addon| AddonResponse::new(addon, currency))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
        };

        Ok(Self {
            uuid: product.uuid.into_uuid(),
            slug: product.slug,
            title: product.title,
            kind,
            price,
            options,
            variants,
            addons,
        })
    }
}

/// Option Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OptionResponse {
    /// Dimension name, e.g. `size`
    pub name: String,

    /// Allowed values
    pub values: Vec<String>,
}

impl From<OptionDimension> for OptionResponse {
    fn from(dimension: OptionDimension) -> Self {
        Self {
            name: dimension.name,
            values: dimension.values,
        }
    }
}

/// Variant Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct VariantResponse {
    /// The unique identifier of the variant
    pub uuid: Uuid,

    /// Stock keeping unit
    pub sku: String,

    /// Option name to value
    pub options: BTreeMap<String, String>,

    /// Unit price including the variant's modifier
    pub price: MoneyResponse,

    /// Units in stock
    pub stock: u32,
}

impl VariantResponse {
    fn new(
        variant: Variant,
        base_price: Option<u64>,
        currency: &'static Currency,
    ) -> Result<Self, StatusError> {
        let price = i64::try_from(base_price.unwrap_or(0))
            .ok()
            .and_then(|base| base.checked_add(variant.price_modifier))
            .and_then(|price| u64::try_from(price).ok())
            .ok_or_else(|| format!("variant {} price is out of range", variant.sku))
            .or_500("failed to render variant")?;

        Ok(Self {
            uuid: variant.uuid.into_uuid(),
            sku: variant.sku,
            options: variant.options,
            price: MoneyResponse::new(price, currency)?,
            stock: variant.stock,
        })
    }
}

/// Addon Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddonResponse {
    /// The unique identifier of the addon
    pub uuid: Uuid,

    /// Display name
    pub name: String,

    /// `standard`, `location`, `duration` or `voucher_delivery`
    pub group: String,

    /// Surcharge, absent for unpriced addons
    pub price: Option<MoneyResponse>,

    /// How the voucher is delivered, for delivery addons
    pub delivery: Option<String>,
}

impl AddonResponse {
    fn new(addon: Addon, currency: &'static Currency) -> Result<Self, StatusError> {
        Ok(Self {
            uuid: addon.uuid.into_uuid(),
            name: addon.name,
            group: addon.group.as_str().to_string(),
            price: addon
                .price
                .map(|price| MoneyResponse::new(price, currency))
                .transpose()?,
            delivery: addon.delivery.map(|delivery| delivery.as_str().to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::EUR;
    use testresult::TestResult;

    use crate::test_helpers::drift_fixture;

    use super::*;

    #[test]
    fn test_variant_prices_include_modifier() -> TestResult {
        let fixture = drift_fixture()?;
        let tshirt = ProductResponse::new(fixture.product("team-tshirt")?.clone(), EUR)?;

        let black = tshirt
            .variants
            .iter()
            .find(|variant| variant.sku == "TEE-BLK-M")
            .ok_or("expected TEE-BLK-M")?;

        let white = tshirt
            .variants
            .iter()
            .find(|variant| variant.sku == "TEE-WHT-M")
            .ok_or("expected TEE-WHT-M")?;

        assert_eq!(tshirt.kind, "physical");
        assert_eq!(black.price.amount, 25_00);
        assert_eq!(white.price.amount, 20_00);
        assert!(tshirt.addons.is_empty());

        Ok(())
    }

    #[test]
    fn test_price_on_request_has_no_price() -> TestResult {
        let fixture = drift_fixture()?;
        let school = ProductResponse::new(fixture.product("drift-school")?.clone(), EUR)?;

        assert_eq!(school.kind, "experience");
        assert!(school.price.is_none());
        assert_eq!(school.addons.len(), 2);

        Ok(())
    }
}
