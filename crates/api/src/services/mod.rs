//! Outbound services.

pub mod catalog;
pub mod http;

pub use catalog::{BackendError, CatalogBackend};
pub use http::HttpCatalogBackend;
