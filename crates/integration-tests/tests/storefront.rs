//! Storefront router against a local fake catalog.

#![allow(clippy::unwrap_used)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use brandview_integration_tests::{FakeCatalog, storefront_state};
use serde_json::Value;
use tower::ServiceExt;

async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(app, uri).await;
    (status, serde_json::from_str(&body).unwrap())
}

#[tokio::test]
async fn test_home_renders_placeholders_without_fetching() {
    let upstream = FakeCatalog::start().await;
    let app = brandview_storefront::app(storefront_state(&upstream.url(), "Apple,Samsung", 2));

    let (status, html) = get(&app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(html.matches("Loading...").count(), 2);
    assert!(html.contains("hx-get=\"/brands/Apple\""));
    assert!(html.contains("hx-get=\"/brands/Samsung\""));
    assert_eq!(upstream.hits(), 0);
}

#[tokio::test]
async fn test_brand_panel_lists_products() {
    let upstream = FakeCatalog::start().await;
    let app = brandview_storefront::app(storefront_state(&upstream.url(), "Apple", 2));

    let (status, html) = get(&app, "/brands/Apple").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Apple Products:"));
    assert!(html.contains("iPhone 9"));
    assert!(html.contains("$899.99"));
    assert!(!html.contains("Samsung Universe 9"));

    let (_, html) = get(&app, "/brands/Fog%20Scent%20Xpressio").await;
    assert!(html.contains("Long lasting perfume"));
    assert_eq!(upstream.hits(), 1);
}

#[tokio::test]
async fn test_failed_panel_offers_retry() {
    let upstream = FakeCatalog::builder().failures(3).start().await;
    let app = brandview_storefront::app(storefront_state(&upstream.url(), "Apple", 2));

    let (status, html) = get(&app, "/brands/Apple").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Error: Something went wrong."));
    assert!(html.contains("hx-get=\"/brands/Apple?retry=true\""));
    assert_eq!(upstream.hits(), 3);

    let (status, html) = get(&app, "/brands/Apple?retry=true").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("iPhone X"));
    assert_eq!(upstream.hits(), 4);
}

#[tokio::test]
async fn test_readiness_follows_catalog() {
    let upstream = FakeCatalog::start().await;
    let app = brandview_storefront::app(storefront_state(&upstream.url(), "Apple", 2));

    assert_eq!(get(&app, "/health").await, (StatusCode::OK, "ok".to_string()));
    assert_eq!(get(&app, "/health/ready").await.0, StatusCode::SERVICE_UNAVAILABLE);

    let (_, snapshot) = get_json(&app, "/health/catalog").await;
    assert_eq!(snapshot["status"], "not_fetched");
    assert!(snapshot["products"].is_null());

    get(&app, "/brands/Apple").await;

    assert_eq!(get(&app, "/health/ready").await.0, StatusCode::OK);
    let (_, snapshot) = get_json(&app, "/health/catalog").await;
    assert_eq!(snapshot["status"], "complete");
    assert_eq!(snapshot["products"], 8);
    assert_eq!(snapshot["endpoint"], upstream.url().as_str());
}

#[tokio::test]
async fn test_api_lists_brands() {
    let upstream = FakeCatalog::start().await;
    let app = brandview_storefront::app(storefront_state(&upstream.url(), "Apple", 2));

    let (status, brands) = get_json(&app, "/api/brands").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        brands,
        serde_json::json!([
            {"brand": "Apple", "products": 2},
            {"brand": "Fog Scent Xpressio", "products": 1},
            {"brand": "Huawei", "products": 1},
            {"brand": "OPPO", "products": 1},
            {"brand": "Samsung", "products": 2},
        ])
    );
}

#[tokio::test]
async fn test_api_brand_products() {
    let upstream = FakeCatalog::start().await;
    let app = brandview_storefront::app(storefront_state(&upstream.url(), "Apple", 2));

    let (status, products) = get_json(&app, "/api/brands/Samsung/products").await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = products
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![3, 6]);

    let (status, _) = get(&app, "/api/brands/Nokia/products").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_api_reports_upstream_failure() {
    let upstream = FakeCatalog::builder().failures(1).start().await;
    let app = brandview_storefront::app(storefront_state(&upstream.url(), "Apple", 0));

    let (status, body) = get(&app, "/api/brands").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, "External service error");
    assert_eq!(upstream.hits(), 1);
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let upstream = FakeCatalog::start().await;
    let app = brandview_storefront::app(storefront_state(&upstream.url(), "Apple", 2));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "req-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers().get("x-request-id").unwrap(), "req-42");
}
