//! HTTP routes for KPI and KRI endpoints.

use axum::{routing::get, Router};

use super::handlers::{
    get_kpi, get_kri, list_kpis, list_kris, update_kpi, update_kri, IndicatorHandlers,
};

/// Routes mounted at `/api/kpis`.
pub fn kpi_routes(handlers: IndicatorHandlers) -> Router {
    Router::new()
        .route("/", get(list_kpis))
        .route("/:id", get(get_kpi).put(update_kpi))
        .with_state(handlers)
}

/// Routes mounted at `/api/kris`.
pub fn kri_routes(handlers: IndicatorHandlers) -> Router {
    Router::new()
        .route("/", get(list_kris))
        .route("/:id", get(get_kri).put(update_kri))
        .with_state(handlers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryKpiRepository, InMemoryKriRepository};
    use crate::application::handlers::testing::RecordingPublisher;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn handlers() -> IndicatorHandlers {
        IndicatorHandlers::new(
            Arc::new(InMemoryKpiRepository::with_demo_data().unwrap()),
            Arc::new(InMemoryKriRepository::with_demo_data().unwrap()),
            Arc::new(RecordingPublisher::default()),
        )
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn kri_update_recomputes_status() {
        let request = Request::put("/KRI002")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"current": 1, "status": "green"}).to_string()))
            .unwrap();

        let (status, body) = send(kri_routes(handlers()), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["current"], 1.0);
        assert_eq!(body["status"], "red");
    }

    #[tokio::test]
    async fn unknown_kpi_is_404() {
        let request = Request::get("/KPI404").body(Body::empty()).unwrap();

        let (status, body) = send(kpi_routes(handlers()), request).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "KPI_NOT_FOUND");
    }

    #[tokio::test]
    async fn lists_demo_kris() {
        let request = Request::get("/").body(Body::empty()).unwrap();

        let (status, body) = send(kri_routes(handlers()), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 3);
    }
}
