//! HTTP adapter for KPI and KRI endpoints.

mod handlers;
mod routes;

pub use handlers::IndicatorHandlers;
pub use routes::{kpi_routes, kri_routes};
