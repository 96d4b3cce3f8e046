//! Catalog Repository

use std::collections::BTreeMap;

use driftworks::catalog::{
    Addon, AddonGroup, AddonUuid, DeliveryMode, ExperienceDetails, LineKind, OptionDimension,
    PhysicalDetails, Product, ProductKind, ProductUuid, Variant, VariantUuid,
};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, types::Json};
use uuid::Uuid;

use crate::domain::{
    catalog::records::{AddonRow, OptionRow, ProductRow, VariantRow},
    columns::{
        amount_param, count_param, position_param, try_get_count, try_get_optional_amount,
        try_get_optional_parsed, try_get_parsed,
    },
};

const LIST_PRODUCTS_SQL: &str = include_str!("sql/list_products.sql");
const GET_PRODUCTS_SQL: &str = include_str!("sql/get_products.sql");
const FIND_PRODUCT_BY_SLUG_SQL: &str = include_str!("sql/find_product_by_slug.sql");
const LIST_OPTIONS_SQL: &str = include_str!("sql/list_options.sql");
const LIST_VARIANTS_SQL: &str = include_str!("sql/list_variants.sql");
const LIST_ADDONS_SQL: &str = include_str!("sql/list_addons.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const CREATE_OPTION_SQL: &str = include_str!("sql/create_option.sql");
const CREATE_VARIANT_SQL: &str = include_str!("sql/create_variant.sql");
const CREATE_ADDON_SQL: &str = include_str!("sql/create_addon.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCatalogRepository;

impl PgCatalogRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_product_rows(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<ProductRow>, sqlx::Error> {
        query_as::<Postgres, ProductRow>(LIST_PRODUCTS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_product_rows(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        products: &[Uuid],
    ) -> Result<Vec<ProductRow>, sqlx::Error> {
        query_as::<Postgres, ProductRow>(GET_PRODUCTS_SQL)
            .bind(products)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn find_product_row_by_slug(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        slug: &str,
    ) -> Result<ProductRow, sqlx::Error> {
        query_as::<Postgres, ProductRow>(FIND_PRODUCT_BY_SLUG_SQL)
            .bind(slug)
            .fetch_one(&mut **tx)
            .await
    }

    /// Load options, variants and addons for `rows` and assemble products,
    /// preserving the order of `rows`.
    pub(crate) async fn assemble(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        rows: Vec<ProductRow>,
    ) -> Result<Vec<Product>, sqlx::Error> {
        let uuids: Vec<Uuid> = rows.iter().map(|row| row.uuid.into_uuid()).collect();

        let options = query_as::<Postgres, OptionRow>(LIST_OPTIONS_SQL)
            .bind(&uuids)
            .fetch_all(&mut **tx)
            .await?;

        let variants = query_as::<Postgres, VariantRow>(LIST_VARIANTS_SQL)
            .bind(&uuids)
            .fetch_all(&mut **tx)
            .await?;

        let addons = query_as::<Postgres, AddonRow>(LIST_ADDONS_SQL)
            .bind(&uuids)
            .fetch_all(&mut **tx)
            .await?;

        let mut options_by_product: BTreeMap<ProductUuid, Vec<OptionDimension>> = BTreeMap::new();
        let mut variants_by_product: BTreeMap<ProductUuid, Vec<Variant>> = BTreeMap::new();
        let mut addons_by_product: BTreeMap<ProductUuid, Vec<Addon>> = BTreeMap::new();

        for row in options {
            options_by_product
                .entry(row.product)
                .or_default()
                .push(row.option);
        }

        for row in variants {
            variants_by_product
                .entry(row.product)
                .or_default()
                .push(row.variant);
        }

        for row in addons {
            addons_by_product
                .entry(row.product)
                .or_default()
                .push(row.addon);
        }

        let products = rows
            .into_iter()
            .map(|row| {
                let kind = match row.kind {
                    LineKind::Physical => ProductKind::Physical(PhysicalDetails {
                        options: options_by_product.remove(&row.uuid).unwrap_or_default(),
                        variants: variants_by_product.remove(&row.uuid).unwrap_or_default(),
                        low_stock_threshold: row.low_stock_threshold,
                    }),
                    LineKind::Experience => ProductKind::Experience(ExperienceDetails {
                        addons: addons_by_product.remove(&row.uuid).unwrap_or_default(),
                    }),
                };

                Product {
                    uuid: row.uuid,
                    slug: row.slug,
                    title: row.title,
                    base_price: row.base_price,
                    kind,
                }
            })
            .collect();

        Ok(products)
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: &Product,
    ) -> Result<(), sqlx::Error> {
        let base_price = product
            .base_price
            .map(|price| amount_param(price, "base_price"))
            .transpose()?;

        let low_stock_threshold = match &product.kind {
            ProductKind::Physical(details) => details.low_stock_threshold,
            ProductKind::Experience(_) => 0,
        };

        query(CREATE_PRODUCT_SQL)
            .bind(product.uuid.into_uuid())
            .bind(&product.slug)
            .bind(&product.title)
            .bind(product.line_kind().as_str())
            .bind(base_price)
            .bind(count_param(low_stock_threshold, "low_stock_threshold")?)
            .execute(&mut **tx)
            .await?;

        match &product.kind {
            ProductKind::Physical(details) => {
                for (position, option) in details.options.iter().enumerate() {
                    query(CREATE_OPTION_SQL)
                        .bind(product.uuid.into_uuid())
                        .bind(position_param(position, "position")?)
                        .bind(&option.name)
                        .bind(&option.values)
                        .execute(&mut **tx)
                        .await?;
                }

                for (position, variant) in details.variants.iter().enumerate() {
                    query(CREATE_VARIANT_SQL)
                        .bind(variant.uuid.into_uuid())
                        .bind(product.uuid.into_uuid())
                        .bind(position_param(position, "position")?)
                        .bind(&variant.sku)
                        .bind(Json(&variant.options))
                        .bind(variant.price_modifier)
                        .bind(count_param(variant.stock, "stock")?)
                        .execute(&mut **tx)
                        .await?;
                }
            }
            ProductKind::Experience(details) => {
                for (position, addon) in details.addons.iter().enumerate() {
                    let price = addon
                        .price
                        .map(|price| amount_param(price, "price"))
                        .transpose()?;

                    query(CREATE_ADDON_SQL)
                        .bind(addon.uuid.into_uuid())
                        .bind(product.uuid.into_uuid())
                        .bind(position_param(position, "position")?)
                        .bind(&addon.name)
                        .bind(addon.group.as_str())
                        .bind(price)
                        .bind(addon.delivery.map(DeliveryMode::as_str))
                        .execute(&mut **tx)
                        .await?;
                }
            }
        }

        Ok(())
    }
}

impl<'r> FromRow<'r, PgRow> for ProductRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            slug: row.try_get("slug")?,
            title: row.try_get("title")?,
            kind: try_get_parsed::<LineKind>(row, "kind")?,
            base_price: try_get_optional_amount(row, "base_price")?,
            low_stock_threshold: try_get_count(row, "low_stock_threshold")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OptionRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            product: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            option: OptionDimension {
                name: row.try_get("name")?,
                values: row.try_get("option_values")?,
            },
        })
    }
}

impl<'r> FromRow<'r, PgRow> for VariantRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let Json(options) = row.try_get::<Json<BTreeMap<String, String>>, _>("options")?;

        Ok(Self {
            product: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            variant: Variant {
                uuid: VariantUuid::from_uuid(row.try_get("uuid")?),
                sku: row.try_get("sku")?,
                options,
                price_modifier: row.try_get("price_modifier")?,
                stock: try_get_count(row, "stock")?,
            },
        })
    }
}

impl<'r> FromRow<'r, PgRow> for AddonRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            product: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            addon: Addon {
                uuid: AddonUuid::from_uuid(row.try_get("uuid")?),
                name: row.try_get("name")?,
                group: try_get_parsed::<AddonGroup>(row, "addon_group")?,
                price: try_get_optional_amount(row, "price")?,
                delivery: try_get_optional_parsed::<DeliveryMode>(row, "delivery_mode")?,
            },
        })
    }
}
