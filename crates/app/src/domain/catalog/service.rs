//! Catalog service.

use async_trait::async_trait;
use driftworks::catalog::{Catalog, Product, ProductUuid};
use mockall::automock;
use tracing::{Span, info};
use uuid::Uuid;

use crate::{
    database::Db,
    domain::catalog::{errors::CatalogServiceError, repository::PgCatalogRepository},
};

#[derive(Debug, Clone)]
pub struct PgCatalogService {
    db: Db,
    repository: PgCatalogRepository,
}

impl PgCatalogService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCatalogRepository::new(),
        }
    }
}

#[async_trait]
impl CatalogService for PgCatalogService {
    async fn list_products(&self) -> Result<Vec<Product>, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let rows = self.repository.list_product_rows(&mut tx).await?;
        let products = self.repository.assemble(&mut tx, rows).await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn get_product(&self, product: ProductUuid) -> Result<Product, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let rows = self
            .repository
            .get_product_rows(&mut tx, &[product.into_uuid()])
            .await?;

        let product = self
            .repository
            .assemble(&mut tx, rows)
            .await?
            .pop()
            .ok_or(CatalogServiceError::NotFound)?;

        tx.commit().await?;

        Ok(product)
    }

    async fn get_product_by_slug(&self, slug: &str) -> Result<Product, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let row = self.repository.find_product_row_by_slug(&mut tx, slug).await?;

        let product = self
            .repository
            .assemble(&mut tx, vec![row])
            .await?
            .pop()
            .ok_or(CatalogServiceError::NotFound)?;

        tx.commit().await?;

        Ok(product)
    }

    #[tracing::instrument(
        name = "catalog.service.get_products",
        skip(self, products),
        fields(requested = products.len(), found = tracing::field::Empty),
        err
    )]
    async fn get_products(
        &self,
        products: Vec<ProductUuid>,
    ) -> Result<Catalog, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let uuids: Vec<Uuid> = products.iter().map(|uuid| uuid.into_uuid()).collect();

        let rows = self.repository.get_product_rows(&mut tx, &uuids).await?;
        let products = self.repository.assemble(&mut tx, rows).await?;

        tx.commit().await?;

        Span::current().record("found", products.len());

        Ok(Catalog::new(products))
    }

    #[tracing::instrument(
        name = "catalog.service.import_product",
        skip(self, product),
        fields(product_uuid = %product.uuid, slug = %product.slug),
        err
    )]
    async fn import_product(&self, product: Product) -> Result<Product, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        self.repository.create_product(&mut tx, &product).await?;

        tx.commit().await?;

        info!(product_uuid = %product.uuid, "imported product");

        Ok(product)
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// All products, experiences first, each ordered by slug.
    async fn list_products(&self) -> Result<Vec<Product>, CatalogServiceError>;

    /// Retrieve a single product with its options, variants and addons.
    async fn get_product(&self, product: ProductUuid) -> Result<Product, CatalogServiceError>;

    /// Retrieve a single product by its slug.
    async fn get_product_by_slug(&self, slug: &str) -> Result<Product, CatalogServiceError>;

    /// Snapshot of the requested products. Unknown ids are left out.
    async fn get_products(&self, products: Vec<ProductUuid>)
    -> Result<Catalog, CatalogServiceError>;

    /// Persist a product together with its options, variants and addons.
    async fn import_product(&self, product: Product) -> Result<Product, CatalogServiceError>;
}

#[cfg(test)]
mod tests {
    use driftworks::catalog::{ProductKind, ProductLookup};
    use testresult::TestResult;

    use crate::test::{TestContext, helpers::drift_fixture};

    use super::*;

    #[tokio::test]
    async fn imported_product_reads_back_identically() -> TestResult {
        let ctx = TestContext::new().await;
        let fixture = drift_fixture()?;
        let taxi = fixture.product("drift-taxi")?.clone();

        ctx.catalog.import_product(taxi.clone()).await?;

        let loaded = ctx.catalog.get_product(taxi.uuid).await?;

        assert_eq!(loaded, taxi);

        Ok(())
    }

    #[tokio::test]
    async fn physical_product_keeps_variants_and_options() -> TestResult {
        let ctx = TestContext::new().await;
        let fixture = drift_fixture()?;
        let tshirt = fixture.product("team-tshirt")?.clone();

        ctx.catalog.import_product(tshirt.clone()).await?;

        let loaded = ctx.catalog.get_product_by_slug("team-tshirt").await?;

        let ProductKind::Physical(details) = &loaded.kind else {
            panic!("expected a physical product, got {:?}", loaded.kind);
        };

        assert_eq!(details.variants.len(), 4);
        assert_eq!(details.low_stock_threshold, 3);
        assert_eq!(loaded, tshirt);

        Ok(())
    }

    #[tokio::test]
    async fn get_products_skips_unknown_ids() -> TestResult {
        let ctx = TestContext::new().await;
        let fixture = drift_fixture()?;
        let keyring = fixture.product("tyre-keyring")?.clone();

        ctx.catalog.import_product(keyring.clone()).await?;

        let catalog = ctx
            .catalog
            .get_products(vec![keyring.uuid, ProductUuid::new()])
            .await?;

        assert_eq!(catalog.len(), 1);
        assert!(catalog.product(keyring.uuid).is_some());

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_slug_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let fixture = drift_fixture()?;
        let school = fixture.product("drift-school")?.clone();

        ctx.catalog.import_product(school.clone()).await?;

        let mut copy = school;
        copy.uuid = ProductUuid::new();

        let result = ctx.catalog.import_product(copy).await;

        assert!(
            matches!(result, Err(CatalogServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unknown_slug_is_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.catalog.get_product_by_slug("hovercraft").await;

        assert!(matches!(result, Err(CatalogServiceError::NotFound)));
    }
}
