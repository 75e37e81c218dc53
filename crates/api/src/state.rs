//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ApiConfig;
use crate::services::{BackendError, CatalogBackend, HttpCatalogBackend};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the catalog backend.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    backend: Arc<dyn CatalogBackend>,
}

impl AppState {
    /// Create state backed by the HTTP catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self, BackendError> {
        let backend = HttpCatalogBackend::new(&config.backend)?;
        Ok(Self::with_backend(config, Arc::new(backend)))
    }

    /// Create state with an explicit backend.
    #[must_use]
    pub fn with_backend(config: ApiConfig, backend: Arc<dyn CatalogBackend>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, backend }),
        }
    }

    /// Get a reference to the gateway configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog backend.
    #[must_use]
    pub fn backend(&self) -> &dyn CatalogBackend {
        self.inner.backend.as_ref()
    }
}
