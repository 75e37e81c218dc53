//! Recommendations: route params and query string validated together.

use axum::http::StatusCode;
use serde_json::json;
use shelfgate_integration_tests::{TestApp, violations};

const PRODUCT: &str = "7c9e6679-7425-40de-944b-e07fc1f90ae7";

#[tokio::test]
async fn test_default_limit() {
    let app = TestApp::new();
    let resp = app.get(&format!("/products/{PRODUCT}/recommendations")).await;
    assert_eq!(resp.status, StatusCode::OK);

    let calls = app.backend.calls();
    assert_eq!(calls[0].operation, "recommendations");
    assert_eq!(calls[0].body, json!({"productId": PRODUCT, "limit": 5}));
}

#[tokio::test]
async fn test_explicit_limit() {
    let app = TestApp::new();
    let resp = app
        .get(&format!("/products/{PRODUCT}/recommendations?limit=20"))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(app.backend.calls()[0].body["limit"], 20);
}

#[tokio::test]
async fn test_limit_out_of_range() {
    let app = TestApp::new();
    for limit in ["0", "21", "2.5", "many"] {
        let resp = app
            .get(&format!("/products/{PRODUCT}/recommendations?limit={limit}"))
            .await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST, "limit={limit}");
        assert_eq!(violations(&resp.body)[0].0, "limit");
    }
    assert!(app.backend.calls().is_empty());
}

#[tokio::test]
async fn test_invalid_product_id() {
    let app = TestApp::new();
    let resp = app.get("/products/not-a-uuid/recommendations").await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        violations(&resp.body),
        vec![("productId".to_owned(), "Invalid product ID".to_owned())]
    );
}
