//! HTTP routes for dashboard, analytics and report endpoints.

use axum::{routing::get, Router};

use super::handlers::{
    dashboard_summary, department_distribution, executive_summary, risk_matrix,
    AnalyticsHandlers,
};

/// Routes mounted at `/api`.
pub fn analytics_routes(handlers: AnalyticsHandlers) -> Router {
    Router::new()
        .route("/dashboard/summary", get(dashboard_summary))
        .route("/analytics/risk-matrix", get(risk_matrix))
        .route("/analytics/department-distribution", get(department_distribution))
        .route("/reports/executive-summary", get(executive_summary))
        .with_state(handlers)
}
