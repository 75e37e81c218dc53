//! Integration tests for Shelfgate.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shelfgate-integration-tests
//! ```
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`; the
//! catalog backend is replaced by [`FakeBackend`], which records every call.
//! `tests/http_backend.rs` exercises the real HTTP client against a local
//! stub server instead.
//!
//! # Test Categories
//!
//! - `search` - Query normalization, pagination and the price-range rule
//! - `recommendations` - Route params plus query string
//! - `writes` - Sanitize, validate and forward products, orders, customers
//! - `gateway` - Auth ordering, request IDs, body limits, health

use std::net::{IpAddr, Ipv4Addr};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, StatusCode, header::CONTENT_TYPE, request::Builder},
};
use serde::Serialize;
use serde_json::{Value, json};
use tower::ServiceExt;

use shelfgate_api::config::{ApiConfig, BackendConfig};
use shelfgate_api::middleware::auth::{TENANT_ID_HEADER, USER_ID_HEADER};
use shelfgate_api::services::{BackendError, CatalogBackend};
use shelfgate_api::state::AppState;
use shelfgate_core::TenantId;
use shelfgate_core::schema::customer::Customer;
use shelfgate_core::schema::order::Order;
use shelfgate_core::schema::product::Product;
use shelfgate_core::schema::search::{RecommendationRequest, SearchQuery};

/// Tenant sent on authenticated test requests.
pub const TENANT: &str = "0f8fad5b-d9cb-469f-a165-70867728950e";
/// User sent on authenticated test requests.
pub const USER: &str = "7c9e6679-7425-40de-944b-e07fc1f90ae7";

/// Body limit used by [`test_config`].
pub const BODY_LIMIT: usize = 4096;

/// One call the gateway forwarded.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub operation: &'static str,
    pub tenant: TenantId,
    pub body: Value,
}

/// In-memory [`CatalogBackend`] that records calls and echoes them back.
#[derive(Debug, Default)]
pub struct FakeBackend {
    calls: Mutex<Vec<Call>>,
    down: AtomicBool,
}

impl FakeBackend {
    /// A backend whose every call fails.
    #[must_use]
    pub fn down() -> Self {
        let backend = Self::default();
        backend.down.store(true, Ordering::SeqCst);
        backend
    }

    /// Calls received so far.
    pub fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record<B: Serialize>(
        &self,
        operation: &'static str,
        tenant: TenantId,
        body: &B,
    ) -> Result<Value, BackendError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable("fake backend is down".to_string()));
        }
        let body =
            serde_json::to_value(body).map_err(|e| BackendError::Unavailable(e.to_string()))?;
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Call {
                operation,
                tenant,
                body: body.clone(),
            });
        Ok(json!({ "operation": operation, "received": body }))
    }
}

#[async_trait]
impl CatalogBackend for FakeBackend {
    async fn search_products(
        &self,
        tenant: TenantId,
        query: &SearchQuery,
    ) -> Result<Value, BackendError> {
        self.record("search", tenant, query)
    }

    async fn recommendations(
        &self,
        tenant: TenantId,
        request: &RecommendationRequest,
    ) -> Result<Value, BackendError> {
        self.record("recommendations", tenant, request)
    }

    async fn create_product(
        &self,
        tenant: TenantId,
        product: &Product,
    ) -> Result<Value, BackendError> {
        self.record("create_product", tenant, product)
    }

    async fn create_order(&self, tenant: TenantId, order: &Order) -> Result<Value, BackendError> {
        self.record("create_order", tenant, order)
    }

    async fn create_customer(
        &self,
        tenant: TenantId,
        customer: &Customer,
    ) -> Result<Value, BackendError> {
        self.record("create_customer", tenant, customer)
    }
}

/// Gateway configuration for tests: trusted headers, small body limit.
#[must_use]
pub fn test_config() -> ApiConfig {
    ApiConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        body_limit: BODY_LIMIT,
        trust_gateway_headers: true,
        backend: BackendConfig {
            base_url: url::Url::parse("http://catalog.test/").unwrap_or_else(|e| panic!("{e}")),
            token: None,
            timeout: Duration::from_secs(5),
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// A decoded response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Parsed JSON, or the raw text as a JSON string.
    pub body: Value,
}

/// The gateway router wired to a [`FakeBackend`].
pub struct TestApp {
    router: Router,
    pub backend: Arc<FakeBackend>,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    /// Router with the default config and a working backend.
    #[must_use]
    pub fn new() -> Self {
        Self::with(test_config(), FakeBackend::default())
    }

    /// Router with an explicit config and backend.
    #[must_use]
    pub fn with(config: ApiConfig, backend: FakeBackend) -> Self {
        let backend = Arc::new(backend);
        let state = AppState::with_backend(config, backend.clone());
        Self {
            router: shelfgate_api::router(state),
            backend,
        }
    }

    /// Send a request and decode the response.
    ///
    /// # Panics
    ///
    /// Panics if the router fails to respond.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .unwrap_or_else(|e| match e {});
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap_or_else(|e| panic!("reading response body: {e}"));
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// `GET uri` as the test tenant.
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(build(authenticated(Request::get(uri)), Body::empty()))
            .await
    }

    /// `POST uri` with a JSON body as the test tenant.
    pub async fn post_json(&self, uri: &str, body: &Value) -> TestResponse {
        self.send(json_request(authenticated(Request::post(uri)), body))
            .await
    }

    /// `POST uri` with a JSON body and no identity headers.
    pub async fn post_json_anonymous(&self, uri: &str, body: &Value) -> TestResponse {
        self.send(json_request(Request::post(uri), body)).await
    }
}

/// Add the test tenant's identity headers.
#[must_use]
pub fn authenticated(builder: Builder) -> Builder {
    builder
        .header(TENANT_ID_HEADER, TENANT)
        .header(USER_ID_HEADER, USER)
}

/// Attach a JSON body.
#[must_use]
pub fn json_request(builder: Builder, body: &Value) -> Request<Body> {
    build(
        builder.header(CONTENT_TYPE, "application/json"),
        Body::from(body.to_string()),
    )
}

/// Finish a request.
///
/// # Panics
///
/// Panics if the builder holds an invalid header or URI.
#[must_use]
pub fn build(builder: Builder, body: Body) -> Request<Body> {
    builder
        .body(body)
        .unwrap_or_else(|e| panic!("building request: {e}"))
}

/// `(field, message)` pairs of a validation error body.
#[must_use]
pub fn violations(body: &Value) -> Vec<(String, String)> {
    body["errors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .map(|e| {
                    (
                        e["field"].as_str().unwrap_or_default().to_owned(),
                        e["message"].as_str().unwrap_or_default().to_owned(),
                    )
                })
                .collect()
        })
        .unwrap_or_default()
}

/// A valid shipping or billing address.
#[must_use]
pub fn address() -> Value {
    json!({
        "street": "1 Market St",
        "city": "San Francisco",
        "state": "CA",
        "postal_code": "94105",
        "country": "US",
        "phone": "+14155550123"
    })
}
