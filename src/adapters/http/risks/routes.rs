//! HTTP routes for risk register endpoints.

use axum::{routing::get, Router};

use super::handlers::{create_risk, delete_risk, get_risk, list_risks, update_risk, RiskHandlers};

/// Creates the risk router with all endpoints.
pub fn risk_routes(handlers: RiskHandlers) -> Router {
    Router::new()
        .route("/", get(list_risks).post(create_risk))
        .route("/:id", get(get_risk).put(update_risk).delete(delete_risk))
        .with_state(handlers)
}
