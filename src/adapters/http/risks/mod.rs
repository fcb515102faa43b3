//! HTTP adapter for risk register endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::ListRisksQuery;
pub use handlers::RiskHandlers;
pub use routes::risk_routes;
