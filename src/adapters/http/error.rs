//! JSON error bodies and the mapping from domain errors to HTTP statuses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::DomainError;

/// Standard error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Error returned by REST handlers.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        Self(error)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        let code = self.0.code;
        if code.is_not_found() {
            StatusCode::NOT_FOUND
        } else if code.is_validation() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        let details = (!self.0.details.is_empty())
            .then(|| serde_json::to_value(&self.0.details).ok())
            .flatten();
        let body = ErrorResponse {
            code: self.0.code.to_string(),
            message: self.0.message,
            details,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ErrorCode, ValidationError};

    #[test]
    fn not_found_codes_map_to_404() {
        let err = ApiError(DomainError::new(ErrorCode::KriNotFound, "KRI not found: KRI009"));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn validation_errors_map_to_400() {
        let err = ApiError(ValidationError::out_of_range("impact", 1.0, 5.0, 9.0).into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn storage_errors_map_to_500() {
        let err = ApiError(DomainError::new(ErrorCode::StorageError, "lock poisoned"));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
