//! Identity carried by a bearer credential.
//!
//! Credentials are advisory: whoever fails validation is served as an
//! anonymous viewer, so nothing here gates access.

use thiserror::Error;

use super::UserId;

/// Role given to callers whose credential carries no role claim, and to
/// anonymous callers.
pub const DEFAULT_ROLE: &str = "viewer";

/// A caller whose credential validated.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub role: String,
}

impl AuthenticatedUser {
    pub fn new(id: UserId, role: impl Into<String>) -> Self {
        Self {
            id,
            role: role.into(),
        }
    }
}

/// Why a credential was not accepted, or could not be minted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuthError {
    #[error("credential is malformed or its signature does not verify")]
    InvalidToken,

    #[error("credential has expired")]
    TokenExpired,

    #[error("could not sign credential: {0}")]
    SigningFailed(String),
}
