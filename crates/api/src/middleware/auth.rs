//! Authentication context and extractors.
//!
//! Authentication happens upstream. The auth proxy in front of the gateway
//! forwards the caller's tenant and user as headers; [`gateway_auth_middleware`]
//! turns them into an [`AuthContext`] request extension.

use axum::{
    extract::{FromRequestParts, Request},
    http::{HeaderMap, request::Parts},
    middleware::Next,
    response::Response,
};
use shelfgate_core::{TenantId, UserId};

use crate::error::{AppError, set_sentry_user};

/// Header carrying the caller's tenant.
pub const TENANT_ID_HEADER: &str = "x-tenant-id";
/// Header carrying the caller's user.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub tenant_id: TenantId,
    pub user_id: UserId,
}

impl AuthContext {
    /// Read the context from gateway headers.
    ///
    /// Returns `None` if either header is missing or not a UUID v4.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let read = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
        let tenant_id = TenantId::parse(read(TENANT_ID_HEADER)?).ok()?;
        let user_id = UserId::parse(read(USER_ID_HEADER)?).ok()?;
        Some(Self { tenant_id, user_id })
    }
}

/// Middleware that trusts the upstream auth proxy's identity headers.
///
/// Requests without valid headers pass through with no context; handlers
/// that need one reject them.
pub async fn gateway_auth_middleware(mut request: Request, next: Next) -> Response {
    match AuthContext::from_headers(request.headers()) {
        Some(auth) => {
            set_sentry_user(&auth.user_id, &auth.tenant_id);
            request.extensions_mut().insert(auth);
        }
        None if request.headers().contains_key(TENANT_ID_HEADER) => {
            tracing::debug!("Ignoring malformed gateway identity headers");
        }
        None => {}
    }
    next.run(request).await
}

/// Extractor that optionally gets the authenticated caller.
///
/// Never rejects, so it can run before the validation extractors; call
/// [`require`](Self::require) once the input has been validated.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(
///     auth: OptionalAuth,
///     ValidBody(product): ValidBody<ProductSchema>,
/// ) -> Result<Json<Value>> {
///     let auth = auth.require()?;
///     // ...
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct OptionalAuth(pub Option<AuthContext>);

impl OptionalAuth {
    /// The caller, or 401.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] when no context is present.
    pub fn require(self) -> Result<AuthContext, AppError> {
        match self.0 {
            Some(auth) => Ok(auth),
            None => Err(AppError::Unauthorized),
        }
    }
}

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<AuthContext>().copied()))
    }
}
