//! Catalog reads for server-rendered pages.
//!
//! Served through the shared anonymous client, so responses come from the
//! 100 s revalidation cache when warm.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use babyshop_client::api::{CategoryQuery, ProductQuery};
use babyshop_core::{Banner, Brand, CategoryPage, Product, ProductId, ProductPage};

use crate::error::Result;
use crate::state::AppState;

pub async fn products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<ProductPage>> {
    Ok(Json(state.catalog().products(&query).await?))
}

pub async fn product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    Ok(Json(state.catalog().product(&id).await?))
}

pub async fn categories(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<CategoryPage>> {
    Ok(Json(state.catalog().categories(&query).await?))
}

pub async fn brands(State(state): State<AppState>) -> Result<Json<Vec<Brand>>> {
    Ok(Json(state.catalog().brands().await?))
}

pub async fn banners(State(state): State<AppState>) -> Result<Json<Vec<Banner>>> {
    Ok(Json(state.catalog().banners().await?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::routes::routes;
    use crate::state::test_support;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_products_forward_filters_and_cache() {
        let backend = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products"))
            .and(query_param("page", "2"))
            .and(query_param("search", "crib"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "products": [{ "_id": "p1", "name": "Crib", "price": 120 }],
                "total": 1
            })))
            .expect(1)
            .mount(&backend)
            .await;
        let app = routes().with_state(test_support::state(&backend.uri(), &backend.uri()));

        let (status, first) = get(app.clone(), "/api/products?page=2&search=crib").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["total"], json!(1));
        assert_eq!(first["products"][0]["_id"], json!("p1"));

        let (_, second) = get(app, "/api/products?page=2&search=crib").await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_missing_product_is_404() {
        let backend = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products/nope"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({ "message": "Product not found" })),
            )
            .mount(&backend)
            .await;
        let app = routes().with_state(test_support::state(&backend.uri(), &backend.uri()));

        let (status, body) = get(app, "/api/products/nope").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Product not found" }));
    }

    #[tokio::test]
    async fn test_backend_down_is_503() {
        let app = routes().with_state(test_support::state("http://127.0.0.1:1", "http://127.0.0.1:1"));

        let (status, body) = get(app, "/api/brands").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            body,
            json!({ "error": "Unable to reach the server. Please check your connection." })
        );
    }
}
