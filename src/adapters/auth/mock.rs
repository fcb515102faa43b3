//! Mock session validator for tests.
//!
//! # Example
//!
//! ```ignore
//! let validator = MockSessionValidator::new().with_test_user("valid-token", "alice");
//! let user = validator.validate("valid-token").await?;
//! ```

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::SessionValidator;

/// Maps fixed tokens to users. Unknown tokens return `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockSessionValidator {
    tokens: HashMap<String, AuthenticatedUser>,
    force_error: Option<AuthError>,
}

impl MockSessionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.tokens.insert(token.into(), user);
        self
    }

    /// Adds a token for an `analyst` with the given id; blank ids are ignored.
    pub fn with_test_user(self, token: impl Into<String>, user_id: &str) -> Self {
        match UserId::new(user_id) {
            Ok(id) => self.with_user(token, AuthenticatedUser::new(id, "analyst")),
            Err(_) => self,
        }
    }

    /// Forces all validations to return the specified error.
    pub fn with_error(mut self, error: AuthError) -> Self {
        self.force_error = Some(error);
        self
    }
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if let Some(error) = &self.force_error {
            return Err(error.clone());
        }
        self.tokens.get(token).cloned().ok_or(AuthError::InvalidToken)
    }
}
