//! The catalog/search backend the gateway forwards validated requests to.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use shelfgate_core::TenantId;
use shelfgate_core::schema::customer::Customer;
use shelfgate_core::schema::order::Order;
use shelfgate_core::schema::product::Product;
use shelfgate_core::schema::search::{RecommendationRequest, SearchQuery};

/// Errors that can occur when calling the catalog backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("Backend returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// First part of the response body.
        body: String,
    },

    /// Backend cannot serve the request.
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

/// Operations the gateway forwards. Every call is scoped to one tenant and
/// returns the backend's response untouched.
#[async_trait]
pub trait CatalogBackend: Send + Sync {
    /// Run a normalized product search.
    async fn search_products(
        &self,
        tenant: TenantId,
        query: &SearchQuery,
    ) -> Result<Value, BackendError>;

    /// Products related to one product.
    async fn recommendations(
        &self,
        tenant: TenantId,
        request: &RecommendationRequest,
    ) -> Result<Value, BackendError>;

    async fn create_product(
        &self,
        tenant: TenantId,
        product: &Product,
    ) -> Result<Value, BackendError>;

    async fn create_order(&self, tenant: TenantId, order: &Order) -> Result<Value, BackendError>;

    async fn create_customer(
        &self,
        tenant: TenantId,
        customer: &Customer,
    ) -> Result<Value, BackendError>;
}
