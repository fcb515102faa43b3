//! Domain error vocabulary.
//!
//! [`ValidationError`] describes a rejected field; [`DomainError`] is what
//! repositories and handlers return and what the HTTP layer renders.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// A field value the catalog refuses to store.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must not be blank")]
    EmptyField { field: String },

    #[error("{field} must be within {min}..={max} (got {actual})")]
    OutOfRange {
        field: String,
        min: f64,
        max: f64,
        actual: f64,
    },
}

impl ValidationError {
    pub fn empty_field(field: impl Into<String>) -> Self {
        Self::EmptyField {
            field: field.into(),
        }
    }

    pub fn out_of_range(field: impl Into<String>, min: f64, max: f64, actual: f64) -> Self {
        Self::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    pub fn field(&self) -> &str {
        match self {
            Self::EmptyField { field } | Self::OutOfRange { field, .. } => field,
        }
    }

    fn code(&self) -> ErrorCode {
        match self {
            Self::EmptyField { .. } => ErrorCode::EmptyField,
            Self::OutOfRange { .. } => ErrorCode::OutOfRange,
        }
    }
}

/// Machine-readable error code; rendered as `SCREAMING_SNAKE_CASE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    EmptyField,
    OutOfRange,

    RiskNotFound,
    KpiNotFound,
    KriNotFound,

    /// A repository backend failed.
    StorageError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::EmptyField => "EMPTY_FIELD",
            ErrorCode::OutOfRange => "OUT_OF_RANGE",
            ErrorCode::RiskNotFound => "RISK_NOT_FOUND",
            ErrorCode::KpiNotFound => "KPI_NOT_FOUND",
            ErrorCode::KriNotFound => "KRI_NOT_FOUND",
            ErrorCode::StorageError => "STORAGE_ERROR",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ErrorCode::RiskNotFound | ErrorCode::KpiNotFound | ErrorCode::KriNotFound
        )
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ErrorCode::EmptyField | ErrorCode::OutOfRange)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error carried out of repositories and handlers.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("[{code}] {message}")]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    /// Extra context rendered into the error body, e.g. the offending field.
    pub details: BTreeMap<String, String>,
}

impl DomainError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: BTreeMap::new(),
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    pub fn is_not_found(&self) -> bool {
        self.code.is_not_found()
    }
}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        let field = err.field().to_string();
        DomainError::new(err.code(), err.to_string()).with_detail("field", field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_names_bounds() {
        let err = ValidationError::out_of_range("likelihood", 1.0, 5.0, 7.0);
        assert_eq!(err.to_string(), "likelihood must be within 1..=5 (got 7)");
    }

    #[test]
    fn domain_error_displays_code_and_message() {
        let err = DomainError::new(ErrorCode::RiskNotFound, "Risk not found: R009");
        assert_eq!(err.to_string(), "[RISK_NOT_FOUND] Risk not found: R009");
    }

    #[test]
    fn validation_converts_with_field_detail() {
        let err: DomainError = ValidationError::empty_field("name").into();

        assert_eq!(err.code, ErrorCode::EmptyField);
        assert!(err.code.is_validation());
        assert_eq!(err.details.get("field").map(String::as_str), Some("name"));
    }

    #[test]
    fn not_found_codes() {
        assert!(DomainError::new(ErrorCode::KriNotFound, "x").is_not_found());
        assert!(!ErrorCode::StorageError.is_not_found());
        assert!(!ErrorCode::KpiNotFound.is_validation());
    }
}
