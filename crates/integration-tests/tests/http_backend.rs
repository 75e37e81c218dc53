//! The HTTP backend client against a local stub server.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    routing::post,
};
use secrecy::SecretString;
use serde_json::{Value, json};
use shelfgate_api::config::BackendConfig;
use shelfgate_api::services::{BackendError, CatalogBackend, HttpCatalogBackend};
use shelfgate_core::TenantId;
use shelfgate_core::schema::search::RecommendationRequest;
use shelfgate_integration_tests::TENANT;

#[derive(Debug, Clone)]
struct Seen {
    path: String,
    tenant: Option<String>,
    authorization: Option<String>,
    body: Value,
}

type Log = Arc<Mutex<Vec<Seen>>>;

async fn record(
    State(log): State<Log>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    };
    log.lock().unwrap_or_else(PoisonError::into_inner).push(Seen {
        path: uri.path().to_owned(),
        tenant: header("x-tenant-id"),
        authorization: header("authorization"),
        body,
    });
    if uri.path().ends_with("/products") {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"detail": "maintenance"})),
        );
    }
    (StatusCode::OK, Json(json!({"items": []})))
}

async fn stub() -> (String, Log) {
    let log = Log::default();
    let app = Router::new()
        .route("/v1/{operation}", post(record))
        .with_state(log.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap_or_else(|e| panic!("bind: {e}"));
    let addr = listener
        .local_addr()
        .unwrap_or_else(|e| panic!("local_addr: {e}"));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}/v1/"), log)
}

fn client(base: &str, token: Option<&str>) -> HttpCatalogBackend {
    HttpCatalogBackend::new(&BackendConfig {
        base_url: url::Url::parse(base).unwrap_or_else(|e| panic!("{e}")),
        token: token.map(SecretString::from),
        timeout: Duration::from_secs(5),
    })
    .unwrap_or_else(|e| panic!("client: {e}"))
}

fn tenant() -> TenantId {
    TenantId::parse(TENANT).unwrap_or_else(|e| panic!("{e}"))
}

#[tokio::test]
async fn test_posts_json_with_tenant_and_token() {
    let (base, log) = stub().await;
    let backend = client(&base, Some("backend-token"));
    let request = RecommendationRequest {
        product_id: shelfgate_core::ProductId::parse("7c9e6679-7425-40de-944b-e07fc1f90ae7")
            .unwrap_or_else(|e| panic!("{e}")),
        limit: 5,
    };

    let response = backend.recommendations(tenant(), &request).await;
    assert_eq!(response.ok(), Some(json!({"items": []})));

    let seen = log.lock().unwrap_or_else(PoisonError::into_inner).clone();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].path, "/v1/recommendations");
    assert_eq!(seen[0].tenant.as_deref(), Some(TENANT));
    assert_eq!(seen[0].authorization.as_deref(), Some("Bearer backend-token"));
    assert_eq!(
        seen[0].body,
        json!({"productId": "7c9e6679-7425-40de-944b-e07fc1f90ae7", "limit": 5})
    );
}

#[tokio::test]
async fn test_no_token_no_authorization_header() {
    let (base, log) = stub().await;
    let backend = client(&base, None);
    let query = shelfgate_core::schema::parse(
        &shelfgate_core::schema::search::SearchQuerySchema,
        &json!({}),
    )
    .unwrap_or_else(|e| panic!("{e}"));

    assert!(backend.search_products(tenant(), &query).await.is_ok());
    let seen = log.lock().unwrap_or_else(PoisonError::into_inner).clone();
    assert_eq!(seen[0].path, "/v1/search");
    assert_eq!(seen[0].authorization, None);
}

#[tokio::test]
async fn test_non_success_status() {
    let (base, _log) = stub().await;
    let backend = client(&base, None);
    let product = shelfgate_core::schema::parse(
        &shelfgate_core::schema::product::ProductSchema,
        &json!({
            "name": "Tea",
            "sku": "TEA001",
            "price": 1,
            "stock_quantity": 1,
            "categories": ["a3bb189e-8bf9-4888-9912-ace4e6543002"]
        }),
    )
    .unwrap_or_else(|e| panic!("{e}"));

    match backend.create_product(tenant(), &product).await {
        Err(BackendError::Status { status, body }) => {
            assert_eq!(status, 503);
            assert!(body.contains("maintenance"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_backend() {
    let backend = client("http://127.0.0.1:9/v1/", None);
    let customer = shelfgate_core::schema::parse(
        &shelfgate_core::schema::customer::CustomerSchema,
        &json!({"email": "ada@example.com", "first_name": "Ada", "last_name": "Lovelace"}),
    )
    .unwrap_or_else(|e| panic!("{e}"));

    assert!(matches!(
        backend.create_customer(tenant(), &customer).await,
        Err(BackendError::Transport(_))
    ));
}
