//! Authentication configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Signing secret used when none is configured. Never accepted in production.
pub const DEMO_JWT_SECRET: &str = "demo-secret";

/// Authentication configuration (HS256 JWT)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// Shared secret for HS256 tokens
    #[serde(default)]
    pub jwt_secret: Option<SecretString>,
}

impl AuthConfig {
    /// The configured secret, or the demo secret when unset or blank.
    pub fn signing_secret(&self) -> SecretString {
        match &self.jwt_secret {
            Some(secret) if !secret.expose_secret().trim().is_empty() => secret.clone(),
            _ => SecretString::new(DEMO_JWT_SECRET.to_string()),
        }
    }

    /// True when tokens would be signed with the demo secret.
    pub fn uses_demo_secret(&self) -> bool {
        self.signing_secret().expose_secret() == DEMO_JWT_SECRET
    }

    /// Validate authentication configuration
    ///
    /// In production an explicit, non-demo secret is required.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if *environment == Environment::Production && self.uses_demo_secret() {
            return Err(ValidationError::DefaultSecretInProduction);
        }
        Ok(())
    }
}
