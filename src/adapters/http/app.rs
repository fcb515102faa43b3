//! Composition of the repositories, real-time services and HTTP routes.

use std::sync::Arc;

use axum::{http::HeaderValue, middleware, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::adapters::auth::JwtSessionValidator;
use crate::adapters::memory::{
    InMemoryKpiRepository, InMemoryKriRepository, InMemoryRiskRepository,
};
use crate::adapters::websocket::{websocket_router, EventRouter, RoomManager, WebSocketState};
use crate::application::AnalyticsService;
use crate::config::{AllowedOrigins, AuthConfig, ServerConfig};
use crate::domain::foundation::DomainError;
use crate::ports::{
    KpiRepository, KriRepository, RealtimePublisher, RiskRepository, SessionValidator,
};

use super::analytics::{analytics_routes, AnalyticsHandlers};
use super::indicators::{kpi_routes, kri_routes, IndicatorHandlers};
use super::middleware::auth_middleware;
use super::risks::{risk_routes, RiskHandlers};
use super::system::{system_routes, SystemState};

/// Shared services behind the REST and WebSocket surfaces.
#[derive(Clone)]
pub struct AppServices {
    pub risks: Arc<dyn RiskRepository>,
    pub kpis: Arc<dyn KpiRepository>,
    pub kris: Arc<dyn KriRepository>,
    pub rooms: Arc<RoomManager>,
    pub analytics: Arc<AnalyticsService>,
    pub router: Arc<EventRouter>,
    pub validator: Arc<dyn SessionValidator>,
}

impl AppServices {
    pub fn new(
        risks: Arc<dyn RiskRepository>,
        kpis: Arc<dyn KpiRepository>,
        kris: Arc<dyn KriRepository>,
        validator: Arc<dyn SessionValidator>,
    ) -> Self {
        let rooms = Arc::new(RoomManager::new());
        let analytics = Arc::new(AnalyticsService::new(
            risks.clone(),
            kpis.clone(),
            kris.clone(),
        ));
        let router = Arc::new(EventRouter::new(rooms.clone(), analytics.clone()));
        Self {
            risks,
            kpis,
            kris,
            rooms,
            analytics,
            router,
            validator,
        }
    }

    /// In-memory repositories seeded with the demo catalog and a JWT
    /// validator using the configured secret.
    pub fn demo(auth: &AuthConfig) -> Result<Self, DomainError> {
        Ok(Self::new(
            Arc::new(InMemoryRiskRepository::with_demo_data()?),
            Arc::new(InMemoryKpiRepository::with_demo_data()?),
            Arc::new(InMemoryKriRepository::with_demo_data()?),
            Arc::new(JwtSessionValidator::new(auth.signing_secret())),
        ))
    }

    fn publisher(&self) -> Arc<dyn RealtimePublisher> {
        self.router.clone()
    }
}

/// Builds the full application: REST under `/api`, WebSocket at `/ws`.
pub fn build_router(services: &AppServices, server: &ServerConfig) -> Router {
    let api = Router::new()
        .nest(
            "/risks",
            risk_routes(RiskHandlers::new(services.risks.clone(), services.publisher())),
        )
        .nest("/kpis", kpi_routes(indicator_handlers(services)))
        .nest("/kris", kri_routes(indicator_handlers(services)))
        .merge(analytics_routes(AnalyticsHandlers::new(
            services.analytics.clone(),
        )))
        .merge(system_routes(SystemState::new(services.rooms.clone())))
        .layer(middleware::from_fn_with_state(
            services.validator.clone(),
            auth_middleware,
        ));

    let socket = websocket_router(WebSocketState::new(
        services.rooms.clone(),
        services.router.clone(),
        services.validator.clone(),
    ));

    Router::new()
        .nest("/api", api)
        .merge(socket)
        .layer(cors_layer(server.allowed_origins()))
        .layer(TraceLayer::new_for_http())
}

fn indicator_handlers(services: &AppServices) -> IndicatorHandlers {
    IndicatorHandlers::new(
        services.kpis.clone(),
        services.kris.clone(),
        services.publisher(),
    )
}

fn cors_layer(origins: AllowedOrigins) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    let listed = match origins {
        AllowedOrigins::Any => return layer.allow_origin(Any),
        AllowedOrigins::Listed(listed) => listed,
    };

    let allowed: Vec<HeaderValue> = listed
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(allowed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;

    fn app() -> Router {
        let services = AppServices::demo(&AuthConfig::default()).unwrap();
        build_router(&services, &ServerConfig::default())
    }

    #[tokio::test]
    async fn api_routes_are_nested() {
        for uri in [
            "/api/health",
            "/api/risks",
            "/api/risks/R001",
            "/api/kpis",
            "/api/kris/KRI003",
            "/api/dashboard/summary",
            "/api/analytics/risk-matrix",
            "/api/reports/executive-summary",
            "/api/realtime/stats",
        ] {
            let response = app()
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
        }
    }

    #[tokio::test]
    async fn allowed_origin_gets_cors_header() {
        let request = Request::get("/api/health")
            .header(header::ORIGIN, "http://localhost:3000")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:3000"
        );
    }
}
