//! Fixtures
//!
//! YAML catalog fixtures, used to seed a database and to drive tests with a
//! realistic catalog.

use std::{fs, path::PathBuf};

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    catalog::{AddonUuid, Catalog, Product, ProductKind, ProductUuid},
    fixtures::catalog::CatalogFixture,
};

pub mod catalog;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Product data does not fit its kind
    #[error("Invalid product {key}: {reason}")]
    InvalidProduct {
        /// Fixture key of the product
        key: String,
        /// What is wrong
        reason: String,
    },

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Addon not found
    #[error("Addon not found: {product}/{addon}")]
    AddonNotFound {
        /// Product fixture key
        product: String,
        /// Addon fixture key
        addon: String,
    },
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Loaded products
    catalog: Catalog,

    /// Product fixture key -> product UUID
    product_keys: FxHashMap<String, ProductUuid>,

    /// (product key, addon key) -> addon UUID
    addon_keys: FxHashMap<(String, String), AddonUuid>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: Catalog::default(),
            product_keys: FxHashMap::default(),
            addon_keys: FxHashMap::default(),
            currency: None,
        }
    }

    /// Load a named catalog from `<base>/catalog/<name>.yml`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if its
    /// products are invalid.
    pub fn load_catalog(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("catalog").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;

        self.load_catalog_str(&contents)
    }

    /// Load catalog products from YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text cannot be parsed, if a product is invalid
    /// or if currencies differ between products.
    pub fn load_catalog_str(&mut self, contents: &str) -> Result<&mut Self, FixtureError> {
        let fixture: CatalogFixture = serde_norway::from_str(contents)?;

        for (key, product_fixture) in fixture.products {
            let loaded = product_fixture.into_product(&key)?;

            if let Some(currency) = loaded.currency {
                self.check_currency(currency)?;
            }

            for (addon_key, addon_uuid) in loaded.addon_keys {
                self.addon_keys.insert((key.clone(), addon_key), addon_uuid);
            }

            self.product_keys.insert(key, loaded.product.uuid);
            self.catalog.insert(loaded.product);
        }

        Ok(self)
    }

    /// Load a complete fixture set
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_catalog(name)?;

        Ok(fixture)
    }

    /// Get a product by its fixture key
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product(&self, key: &str) -> Result<&Product, FixtureError> {
        self.product_keys
            .get(key)
            .and_then(|uuid| crate::catalog::ProductLookup::product(&self.catalog, *uuid))
            .ok_or_else(|| FixtureError::ProductNotFound(key.to_string()))
    }

    /// Get an addon UUID by product and addon fixture keys
    ///
    /// # Errors
    ///
    /// Returns an error if the addon is not found.
    pub fn addon(&self, product: &str, addon: &str) -> Result<AddonUuid, FixtureError> {
        self.addon_keys
            .get(&(product.to_string(), addon.to_string()))
            .copied()
            .ok_or_else(|| FixtureError::AddonNotFound {
                product: product.to_string(),
                addon: addon.to_string(),
            })
    }

    /// All loaded products
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Consume the fixture, keeping only the catalog
    pub fn into_catalog(self) -> Catalog {
        self.catalog
    }

    /// Currency shared by all priced products, if any were loaded
    pub fn currency(&self) -> Option<&'static Currency> {
        self.currency
    }

    /// Products with experiences first, then physical goods, each ordered by
    /// slug. Used to import in a stable order.
    pub fn products_sorted(&self) -> Vec<&Product> {
        let mut products: Vec<&Product> = self.catalog.products().collect();

        products.sort_by(|a, b| {
            let rank = |product: &Product| match product.kind {
                ProductKind::Experience(_) => 0,
                ProductKind::Physical(_) => 1,
            };

            rank(a).cmp(&rank(b)).then_with(|| a.slug.cmp(&b.slug))
        });

        products
    }

    fn check_currency(&mut self, currency: &'static Currency) -> Result<(), FixtureError> {
        match self.currency {
            Some(existing) if existing != currency => Err(FixtureError::CurrencyMismatch(
                existing.iso_alpha_code.to_string(),
                currency.iso_alpha_code.to_string(),
            )),
            Some(_) => Ok(()),
            None => {
                self.currency = Some(currency);

                Ok(())
            }
        }
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
