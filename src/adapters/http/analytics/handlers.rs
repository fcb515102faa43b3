//! HTTP handlers for dashboard, analytics and report endpoints.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::ApiError;
use crate::application::AnalyticsService;

#[derive(Clone)]
pub struct AnalyticsHandlers {
    service: Arc<AnalyticsService>,
}

impl AnalyticsHandlers {
    pub fn new(service: Arc<AnalyticsService>) -> Self {
        Self { service }
    }
}

/// GET /api/dashboard/summary
pub async fn dashboard_summary(State(handlers): State<AnalyticsHandlers>) -> Response {
    match handlers.service.dashboard_summary().await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

/// GET /api/analytics/risk-matrix - Occupied likelihood × impact cells
pub async fn risk_matrix(State(handlers): State<AnalyticsHandlers>) -> Response {
    match handlers.service.risk_matrix().await {
        Ok(cells) => (StatusCode::OK, Json(cells)).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

/// GET /api/analytics/department-distribution
pub async fn department_distribution(State(handlers): State<AnalyticsHandlers>) -> Response {
    match handlers.service.department_distribution().await {
        Ok(distribution) => (StatusCode::OK, Json(distribution)).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

/// GET /api/reports/executive-summary
pub async fn executive_summary(State(handlers): State<AnalyticsHandlers>) -> Response {
    match handlers.service.executive_summary().await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}
