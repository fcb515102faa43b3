//! HTTP handlers for risk register endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::OptionalAuth;
use crate::application::{
    CreateRiskCommand, CreateRiskHandler, DeleteRiskCommand, DeleteRiskHandler, GetRiskHandler,
    ListRisksHandler, UpdateRiskCommand, UpdateRiskHandler,
};
use crate::domain::foundation::RiskId;
use crate::domain::risk::{NewRisk, RiskUpdate};
use crate::ports::{RealtimePublisher, RiskRepository};

use super::dto::ListRisksQuery;

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct RiskHandlers {
    list_handler: Arc<ListRisksHandler>,
    get_handler: Arc<GetRiskHandler>,
    create_handler: Arc<CreateRiskHandler>,
    update_handler: Arc<UpdateRiskHandler>,
    delete_handler: Arc<DeleteRiskHandler>,
}

impl RiskHandlers {
    /// Wires every handler to the same repository and publisher.
    pub fn new(repository: Arc<dyn RiskRepository>, publisher: Arc<dyn RealtimePublisher>) -> Self {
        Self {
            list_handler: Arc::new(ListRisksHandler::new(repository.clone())),
            get_handler: Arc::new(GetRiskHandler::new(repository.clone())),
            create_handler: Arc::new(CreateRiskHandler::new(
                repository.clone(),
                publisher.clone(),
            )),
            update_handler: Arc::new(UpdateRiskHandler::new(
                repository.clone(),
                publisher.clone(),
            )),
            delete_handler: Arc::new(DeleteRiskHandler::new(repository, publisher)),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/risks - List risks, optionally filtered
pub async fn list_risks(
    State(handlers): State<RiskHandlers>,
    Query(query): Query<ListRisksQuery>,
) -> Response {
    match handlers.list_handler.handle(query.into()).await {
        Ok(risks) => (StatusCode::OK, Json(risks)).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

/// GET /api/risks/:id - Get one risk
pub async fn get_risk(
    State(handlers): State<RiskHandlers>,
    Path(risk_id): Path<RiskId>,
) -> Response {
    match handlers.get_handler.handle(risk_id).await {
        Ok(risk) => (StatusCode::OK, Json(risk)).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

/// POST /api/risks - Register a new risk
pub async fn create_risk(
    State(handlers): State<RiskHandlers>,
    auth: OptionalAuth,
    Json(input): Json<NewRisk>,
) -> Response {
    let cmd = CreateRiskCommand {
        input,
        actor: auth.actor(),
    };

    match handlers.create_handler.handle(cmd).await {
        Ok(risk) => (StatusCode::CREATED, Json(risk)).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

/// PUT /api/risks/:id - Update and reassess a risk
pub async fn update_risk(
    State(handlers): State<RiskHandlers>,
    auth: OptionalAuth,
    Path(risk_id): Path<RiskId>,
    Json(update): Json<RiskUpdate>,
) -> Response {
    let cmd = UpdateRiskCommand {
        risk_id,
        update,
        actor: auth.actor(),
    };

    match handlers.update_handler.handle(cmd).await {
        Ok(risk) => (StatusCode::OK, Json(risk)).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

/// DELETE /api/risks/:id - Remove a risk
pub async fn delete_risk(
    State(handlers): State<RiskHandlers>,
    auth: OptionalAuth,
    Path(risk_id): Path<RiskId>,
) -> Response {
    let cmd = DeleteRiskCommand {
        risk_id,
        actor: auth.actor(),
    };

    match handlers.delete_handler.handle(cmd).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}
