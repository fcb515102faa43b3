//! HS256 JWT session validator.
//!
//! Tokens carry a `userId` claim, an optional `role` and an optional
//! `exp`. Expiry is enforced when present.

use async_trait::async_trait;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId, DEFAULT_ROLE};
use crate::ports::SessionValidator;

/// Claims carried by a dashboard access token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Expiry timestamp (Unix epoch seconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Claims {
    pub fn new(user_id: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role: Some(role.into()),
            exp: None,
        }
    }

    pub fn expiring_at(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }
}

/// Validates tokens signed with a shared HMAC secret.
pub struct JwtSessionValidator {
    secret: SecretString,
}

impl JwtSessionValidator {
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // `exp` is optional; only checked when the token carries it.
        validation.required_spec_claims.clear();
        validation
    }

    /// Signs `claims` with this validator's secret.
    pub fn issue(&self, claims: &Claims) -> Result<String, AuthError> {
        issue_token(&self.secret, claims)
    }
}

impl std::fmt::Debug for JwtSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSessionValidator").finish_non_exhaustive()
    }
}

/// Signs `claims` as an HS256 token.
pub fn issue_token(secret: &SecretString, claims: &Claims) -> Result<String, AuthError> {
    let key = EncodingKey::from_secret(secret.expose_secret().as_bytes());
    encode(&Header::new(Algorithm::HS256), claims, &key)
        .map_err(|e| AuthError::SigningFailed(e.to_string()))
}

#[async_trait]
impl SessionValidator for JwtSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let key = DecodingKey::from_secret(self.secret.expose_secret().as_bytes());

        let claims = decode::<Claims>(token, &key, &Self::validation())
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("Token expired");
                    AuthError::TokenExpired
                }
                _ => {
                    tracing::debug!("Token validation failed: {}", e);
                    AuthError::InvalidToken
                }
            })?
            .claims;

        let user_id = UserId::new(&claims.user_id).map_err(|_| {
            tracing::warn!("Token carries a blank userId");
            AuthError::InvalidToken
        })?;

        Ok(AuthenticatedUser::new(
            user_id,
            claims.role.unwrap_or_else(|| DEFAULT_ROLE.to_string()),
        ))
    }
}
