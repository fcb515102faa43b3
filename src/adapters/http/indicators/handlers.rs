//! HTTP handlers for KPI and KRI endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::OptionalAuth;
use crate::application::{
    GetKpiHandler, GetKriHandler, ListKpisHandler, ListKrisHandler, UpdateKpiCommand,
    UpdateKpiHandler, UpdateKriCommand, UpdateKriHandler,
};
use crate::domain::foundation::{KpiId, KriId};
use crate::domain::risk::{KpiUpdate, KriUpdate};
use crate::ports::{KpiRepository, KriRepository, RealtimePublisher};

#[derive(Clone)]
pub struct IndicatorHandlers {
    list_kpis: Arc<ListKpisHandler>,
    get_kpi: Arc<GetKpiHandler>,
    update_kpi: Arc<UpdateKpiHandler>,
    list_kris: Arc<ListKrisHandler>,
    get_kri: Arc<GetKriHandler>,
    update_kri: Arc<UpdateKriHandler>,
}

impl IndicatorHandlers {
    pub fn new(
        kpis: Arc<dyn KpiRepository>,
        kris: Arc<dyn KriRepository>,
        publisher: Arc<dyn RealtimePublisher>,
    ) -> Self {
        Self {
            list_kpis: Arc::new(ListKpisHandler::new(kpis.clone())),
            get_kpi: Arc::new(GetKpiHandler::new(kpis.clone())),
            update_kpi: Arc::new(UpdateKpiHandler::new(kpis)),
            list_kris: Arc::new(ListKrisHandler::new(kris.clone())),
            get_kri: Arc::new(GetKriHandler::new(kris.clone())),
            update_kri: Arc::new(UpdateKriHandler::new(kris, publisher)),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// KPIs
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/kpis
pub async fn list_kpis(State(handlers): State<IndicatorHandlers>) -> Response {
    match handlers.list_kpis.handle().await {
        Ok(kpis) => (StatusCode::OK, Json(kpis)).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

/// GET /api/kpis/:id
pub async fn get_kpi(
    State(handlers): State<IndicatorHandlers>,
    Path(kpi_id): Path<KpiId>,
) -> Response {
    match handlers.get_kpi.handle(kpi_id).await {
        Ok(kpi) => (StatusCode::OK, Json(kpi)).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

/// PUT /api/kpis/:id
pub async fn update_kpi(
    State(handlers): State<IndicatorHandlers>,
    Path(kpi_id): Path<KpiId>,
    Json(update): Json<KpiUpdate>,
) -> Response {
    match handlers.update_kpi.handle(UpdateKpiCommand { kpi_id, update }).await {
        Ok(kpi) => (StatusCode::OK, Json(kpi)).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// KRIs
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/kris
pub async fn list_kris(State(handlers): State<IndicatorHandlers>) -> Response {
    match handlers.list_kris.handle().await {
        Ok(kris) => (StatusCode::OK, Json(kris)).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

/// GET /api/kris/:id
pub async fn get_kri(
    State(handlers): State<IndicatorHandlers>,
    Path(kri_id): Path<KriId>,
) -> Response {
    match handlers.get_kri.handle(kri_id).await {
        Ok(kri) => (StatusCode::OK, Json(kri)).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

/// PUT /api/kris/:id - Status is recomputed from the merged readings
pub async fn update_kri(
    State(handlers): State<IndicatorHandlers>,
    auth: OptionalAuth,
    Path(kri_id): Path<KriId>,
    Json(update): Json<KriUpdate>,
) -> Response {
    let cmd = UpdateKriCommand {
        kri_id,
        update,
        actor: auth.actor(),
    };

    match handlers.update_kri.handle(cmd).await {
        Ok(kri) => (StatusCode::OK, Json(kri)).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}
