use crate::infra::{AppState, RosterService};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde_json::json;
use std::sync::Arc;
use training_tracker::workflows::training::training_router;

pub(crate) fn with_training_routes(service: Arc<RosterService>) -> axum::Router {
    training_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::build_service;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;
    use training_tracker::config::AppConfig;

    fn app(ready: bool) -> axum::Router {
        let mut config = AppConfig::load().expect("config loads");
        config.roster.path = std::env::temp_dir().join("training-api-routes-absent.xlsx");
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_training_routes(Arc::new(build_service(&config))).layer(Extension(state))
    }

    async fn get(router: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
            .await
            .expect("router dispatch");
        let status = response.status();
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        (status, serde_json::from_slice(&body).unwrap_or_default())
    }

    #[tokio::test]
    async fn health_and_readiness() {
        let (status, payload) = get(app(true), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["status"], "ok");

        let (status, payload) = get(app(false), "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(payload["status"], "initializing");

        let (status, _) = get(app(true), "/ready").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn training_routes_are_mounted() {
        let (status, payload) = get(app(true), "/api/v1/training/options").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(payload["error"].is_string());
    }

    #[tokio::test]
    async fn dashboard_accepts_inline_roster() {
        let body = json!({
            "roster_csv": "Apellido y Nombre,DNI,Puesto,Especialidad,TA - TEORÍA,TA - PRÁCTICA,EC - TEORÍA,EC - PRÁCTICA,Tipo de personal,Empresa\nRuiz Eva,1,Op,Gral,2024-02-01,2024-03-01,2024-02-01,S/N,Contratista,Beta\n",
            "header_row": 0,
            "filter": { "topic": "confined_spaces" }
        });
        let response = app(true)
            .oneshot(
                Request::post("/api/v1/training/dashboard")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(payload["topics"].as_array().map(Vec::len), Some(1));
        assert_eq!(payload["topics"][0]["topic_code"], "EC");
        assert_eq!(payload["topics"][0]["totals"]["pending"], 1);
    }
}
