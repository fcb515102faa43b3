//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types
//! that form the vocabulary of the Risk Pulse domain.

mod auth;
mod errors;
mod ids;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser, DEFAULT_ROLE};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{ConnectionId, KpiId, KriId, RiskId, UserId};
pub use timestamp::Timestamp;
