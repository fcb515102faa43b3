//! Health and real-time statistics endpoints.

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::adapters::websocket::{ConnectionStats, RoomManager};
use crate::domain::foundation::Timestamp;

#[derive(Clone)]
pub struct SystemState {
    rooms: Arc<RoomManager>,
    started_at: Instant,
}

impl SystemState {
    pub fn new(rooms: Arc<RoomManager>) -> Self {
        Self {
            rooms,
            started_at: Instant::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: Timestamp,
    /// Seconds since the router was built.
    pub uptime: f64,
}

/// GET /api/health
pub async fn health(State(state): State<SystemState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Timestamp::now(),
        uptime: state.started_at.elapsed().as_secs_f64(),
    })
}

/// GET /api/realtime/stats - Connection and per-room member counts
pub async fn realtime_stats(State(state): State<SystemState>) -> Json<ConnectionStats> {
    Json(state.rooms.stats().await)
}

/// Routes mounted at `/api`.
pub fn system_routes(state: SystemState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/realtime/stats", get(realtime_stats))
        .with_state(state)
}
