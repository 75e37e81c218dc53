//! `reqwest` implementation of [`CatalogBackend`].

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use shelfgate_core::TenantId;
use shelfgate_core::schema::customer::Customer;
use shelfgate_core::schema::order::Order;
use shelfgate_core::schema::product::Product;
use shelfgate_core::schema::search::{RecommendationRequest, SearchQuery};

use super::catalog::{BackendError, CatalogBackend};
use crate::config::BackendConfig;

/// Header carrying the tenant on every backend call.
pub const TENANT_HEADER: &str = "x-tenant-id";

/// Longest slice of an error body kept for logs and error messages.
const ERROR_BODY_PREVIEW: usize = 500;

/// Catalog backend reached over HTTP.
///
/// Every operation is a JSON `POST` to a path under the configured base URL.
#[derive(Clone)]
pub struct HttpCatalogBackend {
    client: reqwest::Client,
    base_url: Url,
    token: Option<SecretString>,
}

impl HttpCatalogBackend {
    /// Create a backend client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            token: config.token.clone(),
        })
    }

    /// POST `body` to `path` on behalf of `tenant`.
    #[instrument(skip(self, body))]
    async fn post<B: Serialize + Sync>(
        &self,
        path: &str,
        tenant: TenantId,
        body: &B,
    ) -> Result<Value, BackendError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| BackendError::Unavailable(format!("invalid backend path {path}: {e}")))?;

        let mut request = self
            .client
            .post(url)
            .header(TENANT_HEADER, tenant.to_string())
            .json(body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let preview: String = body.chars().take(ERROR_BODY_PREVIEW).collect();
            tracing::error!(
                status = %status,
                body = %preview,
                "Catalog backend returned non-success status"
            );
            return Err(BackendError::Status {
                status: status.as_u16(),
                body: preview,
            });
        }

        debug!(status = %status, "Catalog backend call succeeded");
        Ok(response.json().await?)
    }
}

#[async_trait]
impl CatalogBackend for HttpCatalogBackend {
    async fn search_products(
        &self,
        tenant: TenantId,
        query: &SearchQuery,
    ) -> Result<Value, BackendError> {
        self.post("search", tenant, query).await
    }

    async fn recommendations(
        &self,
        tenant: TenantId,
        request: &RecommendationRequest,
    ) -> Result<Value, BackendError> {
        self.post("recommendations", tenant, request).await
    }

    async fn create_product(
        &self,
        tenant: TenantId,
        product: &Product,
    ) -> Result<Value, BackendError> {
        self.post("products", tenant, product).await
    }

    async fn create_order(&self, tenant: TenantId, order: &Order) -> Result<Value, BackendError> {
        self.post("orders", tenant, order).await
    }

    async fn create_customer(
        &self,
        tenant: TenantId,
        customer: &Customer,
    ) -> Result<Value, BackendError> {
        self.post("customers", tenant, customer).await
    }
}
