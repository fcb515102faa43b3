//! HTTP middleware for axum.
//!
//! - `auth` - Advisory bearer authentication and the `OptionalAuth` extractor

pub mod auth;

pub use auth::{auth_middleware, AuthState, OptionalAuth};
