//! Authentication middleware and extractor for axum.
//!
//! This module provides:
//! - `auth_middleware` - Layer that validates Bearer tokens and injects user into extensions
//! - `OptionalAuth` - Extractor for the caller, when one was authenticated
//!
//! Authentication is advisory: every endpoint is readable anonymously, and
//! the caller's identity only shows up as `updatedBy` on the events a
//! mutation publishes.
//!
//! ```text
//! Request → auth_middleware → injects AuthenticatedUser into extensions
//!                                      ↓
//!                              Handler → OptionalAuth extractor reads from extensions
//! ```

use std::convert::Infallible;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::domain::foundation::AuthenticatedUser;
use crate::ports::SessionValidator;

/// Auth middleware state - wraps the session validator.
pub type AuthState = Arc<dyn SessionValidator>;

/// Validates an `Authorization: Bearer <token>` header when present.
///
/// On success the `AuthenticatedUser` is added to the request extensions.
/// Missing or invalid tokens let the request through unauthenticated.
pub async fn auth_middleware(
    State(validator): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string);

    if let Some(token) = token {
        match validator.validate(&token).await {
            Ok(user) => {
                request.extensions_mut().insert(user);
            }
            Err(e) => {
                tracing::debug!(error = %e, "ignoring invalid bearer token");
            }
        }
    }

    next.run(request).await
}

/// Extractor for optional authentication.
///
/// Returns `None` if no valid token was provided, `Some(user)` if
/// authenticated.
#[derive(Debug, Clone)]
pub struct OptionalAuth(pub Option<AuthenticatedUser>);

impl OptionalAuth {
    /// The caller's user id, for attributing published events.
    pub fn actor(&self) -> Option<String> {
        self.0.as_ref().map(|user| user.id.to_string())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuth(parts.extensions.get::<AuthenticatedUser>().cloned()))
    }
}
