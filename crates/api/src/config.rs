//! Gateway configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CATALOG_BACKEND_URL` - Base URL of the catalog/search backend
//!
//! ## Optional
//! - `SHELFGATE_HOST` - Bind address (default: 127.0.0.1)
//! - `SHELFGATE_PORT` - Listen port (default: 3000)
//! - `CATALOG_BACKEND_TOKEN` - Bearer token sent to the backend
//! - `CATALOG_BACKEND_TIMEOUT_SECS` - Backend request timeout (default: 10)
//! - `SHELFGATE_BODY_LIMIT_BYTES` - Maximum request body size (default: 1048576)
//! - `SHELFGATE_TRUST_GATEWAY_HEADERS` - Read `x-tenant-id`/`x-user-id` from the
//!   upstream auth proxy (default: true)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0-1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0.0-1.0 (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Largest accepted request body, in bytes
    pub body_limit: usize,
    /// Whether to build the auth context from gateway headers
    pub trust_gateway_headers: bool,
    /// Catalog backend connection
    pub backend: BackendConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Catalog backend connection settings.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct BackendConfig {
    /// Base URL; always ends with `/` so relative paths join beneath it
    pub base_url: Url,
    /// Optional bearer token
    pub token: Option<SecretString>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            host: parse_env_or_default("SHELFGATE_HOST", "127.0.0.1")?,
            port: parse_env_or_default("SHELFGATE_PORT", "3000")?,
            body_limit: parse_env_or_default("SHELFGATE_BODY_LIMIT_BYTES", "1048576")?,
            trust_gateway_headers: parse_env_or_default("SHELFGATE_TRUST_GATEWAY_HEADERS", "true")?,
            backend: BackendConfig::from_env()?,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env_or_default("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env_or_default("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl BackendConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw = get_required_env("CATALOG_BACKEND_URL")?;
        let base_url = parse_base_url(&raw).map_err(|e| {
            ConfigError::InvalidEnvVar("CATALOG_BACKEND_URL".to_string(), e.to_string())
        })?;
        let timeout_secs: u64 = parse_env_or_default("CATALOG_BACKEND_TIMEOUT_SECS", "10")?;

        Ok(Self {
            base_url,
            token: get_optional_env("CATALOG_BACKEND_TOKEN").map(SecretString::from),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Parse a base URL, appending a trailing slash so `join` keeps the path.
fn parse_base_url(raw: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config() -> ApiConfig {
        ApiConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            body_limit: 1024,
            trust_gateway_headers: true,
            backend: BackendConfig {
                base_url: parse_base_url("http://catalog.internal/v1").unwrap(),
                token: Some(SecretString::from("super_secret_backend_token")),
                timeout: Duration::from_secs(10),
            },
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    #[test]
    fn test_socket_addr() {
        let addr = config().socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let url = parse_base_url("http://catalog.internal/v1").unwrap();
        assert_eq!(url.as_str(), "http://catalog.internal/v1/");
        assert_eq!(
            url.join("search").unwrap().as_str(),
            "http://catalog.internal/v1/search"
        );

        let url = parse_base_url("http://catalog.internal").unwrap();
        assert_eq!(url.as_str(), "http://catalog.internal/");
    }

    #[test]
    fn test_base_url_rejects_garbage() {
        assert!(parse_base_url("not a url").is_err());
    }

    #[test]
    fn test_backend_debug_redacts_token() {
        let debug_output = format!("{:?}", config().backend);
        assert!(debug_output.contains("catalog.internal"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_backend_token"));
    }

    #[test]
    fn test_parse_env_or_default_uses_default() {
        let port: u16 = parse_env_or_default("SHELFGATE_TEST_UNSET_PORT", "8080").unwrap();
        assert_eq!(port, 8080);
        let err = parse_env_or_default::<u16>("SHELFGATE_TEST_UNSET_BAD", "eighty").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "SHELFGATE_TEST_UNSET_BAD"));
    }
}
