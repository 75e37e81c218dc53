//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures unexpected errors to
//! Sentry before responding to the client. All route handlers and validation
//! extractors return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use shelfgate_core::ValidationError;
use shelfgate_core::schema::Violations;
use shelfgate_core::schema::business::RuleViolation;

use crate::services::BackendError;

/// Application-level error type for the gateway.
#[derive(Debug, Error)]
pub enum AppError {
    /// Input failed a schema or business rule.
    #[error("{0}")]
    Validation(ValidationError),

    /// No authenticated tenant on the request.
    #[error("Unauthorized")]
    Unauthorized,

    /// Request body exceeded the configured limit.
    #[error("Payload too large")]
    PayloadTooLarge,

    /// The catalog backend failed while handling an accepted request.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// The validation pipeline itself failed.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<Violations> for AppError {
    fn from(violations: Violations) -> Self {
        Self::Validation(violations.into())
    }
}

impl From<RuleViolation> for AppError {
    fn from(violation: RuleViolation) -> Self {
        Self::Validation(violation.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Backend(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        match self {
            Self::Validation(body) => (StatusCode::BAD_REQUEST, Json(body)).into_response(),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Unauthorized"})),
            )
                .into_response(),
            Self::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(json!({"error": "Payload too large"})),
            )
                .into_response(),
            Self::Backend(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response(),
            Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"message": "Internal server error"})),
            )
                .into_response(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for the authenticated caller.
pub fn set_sentry_user(user_id: &impl ToString, tenant_id: &impl ToString) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            ..Default::default()
        }));
        scope.set_tag("tenant_id", tenant_id.to_string());
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::Value;

    use super::*;

    async fn body_json(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::Internal("boom".to_string());
        assert_eq!(err.to_string(), "Internal error: boom");
        assert_eq!(AppError::Unauthorized.to_string(), "Unauthorized");
    }

    #[tokio::test]
    async fn test_validation_body() {
        let (status, body) = body_json(Violations::root("Malformed JSON").into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({
                "message": "Validation failed",
                "errors": [{"field": "", "message": "Malformed JSON"}]
            })
        );
    }

    #[tokio::test]
    async fn test_business_body() {
        let (status, body) = body_json(RuleViolation::InvertedPriceRange.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["errors"],
            json!([{"message": "Minimum price cannot be greater than maximum price"}])
        );
    }

    #[tokio::test]
    async fn test_opaque_bodies() {
        assert_eq!(
            body_json(AppError::Unauthorized).await,
            (StatusCode::UNAUTHORIZED, json!({"error": "Unauthorized"}))
        );
        assert_eq!(
            body_json(AppError::Internal("secret detail".to_string())).await,
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"message": "Internal server error"})
            )
        );
        assert_eq!(
            body_json(
                BackendError::Status {
                    status: 502,
                    body: "secret detail".to_string()
                }
                .into()
            )
            .await,
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": "Internal server error"})
            )
        );
        assert_eq!(
            body_json(AppError::PayloadTooLarge).await.0,
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }
}
