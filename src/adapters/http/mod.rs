//! HTTP adapters - REST API implementations.
//!
//! Each resource has its own HTTP adapter; [`app`] assembles them with the
//! WebSocket endpoint into one router.

pub mod analytics;
pub mod app;
pub mod error;
pub mod indicators;
pub mod middleware;
pub mod risks;
pub mod system;

pub use app::{build_router, AppServices};
pub use error::{ApiError, ErrorResponse};
