//! Get Product Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};

use crate::{
    extensions::*,
    products::{errors::into_status_error, responses::ProductResponse},
    state::State,
};

/// Get Product Handler
///
/// Looks a product up by its URL slug.
#[endpoint(
    tags("products"),
    summary = "Get Product",
    responses(
        (status_code = StatusCode::OK, description = "Product found"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
    ),
)]
pub(crate) async fn handler(
    slug: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let product = state
        .app
        .catalog
        .get_product_by_slug(&slug.into_inner())
        .await
        .map_err(into_status_error)?;

    Ok(Json(ProductResponse::new(product, state.app.currency)?))
}

#[cfg(test)]
mod tests {
    use driftworks_app::domain::catalog::CatalogServiceError;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, drift_fixture};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        mocks.bare_service(Router::with_path("products/{slug}").get(handler))
    }

    #[tokio::test]
    async fn test_gets_product_by_slug() -> TestResult {
        let fixture = drift_fixture()?;
        let tshirt = fixture.product("team-tshirt")?.clone();
        let uuid = tshirt.uuid;
        let mut mocks = Mocks::default();

        mocks
            .catalog
            .expect_get_product_by_slug()
            .once()
            .withf(|slug| slug == "team-tshirt")
            .return_once(move |_| Ok(tshirt));

        let mut res = TestClient::get("http://example.com/products/team-tshirt")
            .send(&make_service(mocks))
            .await;

        let body: ProductResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.uuid, uuid.into_uuid());
        assert_eq!(body.options.len(), 2);
        assert_eq!(body.variants.len(), 4);

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_slug_returns_404() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .catalog
            .expect_get_product_by_slug()
            .once()
            .return_once(|_| Err(CatalogServiceError::NotFound));

        let res = TestClient::get("http://example.com/products/drift-bus")
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
