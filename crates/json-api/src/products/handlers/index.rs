//! List Products Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    products::{errors::into_status_error, responses::ProductResponse},
    state::State,
};

/// List Products Handler
#[endpoint(tags("products"), summary = "List Products")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<Vec<ProductResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let products = state
        .app
        .catalog
        .list_products()
        .await
        .map_err(into_status_error)?;

    let body = products
        .into_iter()
        .map(|product| ProductResponse::new(product, state.app.currency))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(body))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, drift_fixture};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        mocks.bare_service(Router::with_path("products").get(handler))
    }

    #[tokio::test]
    async fn test_lists_catalog() -> TestResult {
        let fixture = drift_fixture()?;
        let products: Vec<_> = fixture.products_sorted().into_iter().cloned().collect();
        let mut mocks = Mocks::default();

        mocks
            .catalog
            .expect_list_products()
            .once()
            .return_once(move || Ok(products));

        let mut res = TestClient::get("http://example.com/products")
            .send(&make_service(mocks))
            .await;

        let body: Vec<ProductResponse> = res.take_json().await?;

        let taxi = body
            .iter()
            .find(|product| product.slug == "drift-taxi")
            .ok_or("expected drift-taxi")?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.len(), 4);
        assert_eq!(taxi.price.as_ref().map(|price| price.amount), Some(325_00));
        assert_eq!(taxi.addons.len(), 7);

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_catalog_returns_empty_list() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .catalog
            .expect_list_products()
            .once()
            .return_once(|| Ok(Vec::new()));

        let mut res = TestClient::get("http://example.com/products")
            .send(&make_service(mocks))
            .await;

        let body: Vec<ProductResponse> = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(body.is_empty());

        Ok(())
    }
}
