//! Bearer credential validation.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Turns a raw bearer credential into the user it names.
///
/// Both the REST middleware and the WebSocket upgrade call this; a failure
/// downgrades the caller to anonymous instead of rejecting the request.
/// Expired credentials should yield [`AuthError::TokenExpired`] so the
/// failure can be logged distinctly.
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// `token` is the credential without its `Bearer ` prefix.
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
