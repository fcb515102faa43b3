//! HTTP adapter for dashboard, analytics and report endpoints.

mod handlers;
mod routes;

pub use handlers::AnalyticsHandlers;
pub use routes::analytics_routes;
