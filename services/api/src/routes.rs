use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use coverage_advisor::advisory::{
    advisory_router, AdvisoryService, FactsRepository, InsuranceLine, NotificationSink,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub(crate) struct LineEntry {
    pub(crate) id: InsuranceLine,
    pub(crate) code: &'static str,
    pub(crate) label: &'static str,
}

pub(crate) fn with_advisory_routes<R, N>(service: Arc<AdvisoryService<R, N>>) -> axum::Router
where
    R: FactsRepository + 'static,
    N: NotificationSink + 'static,
{
    advisory_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/lines", axum::routing::get(lines_endpoint))
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

/// Lines the engine can recommend, with the short codes accepted in paths.
pub(crate) async fn lines_endpoint() -> Json<Vec<LineEntry>> {
    let entries = InsuranceLine::ALL
        .into_iter()
        .map(|line| LineEntry {
            id: line,
            code: match line {
                InsuranceLine::ResponsabilidadCivil => "rc",
                InsuranceLine::DanosMateriales => "dm",
            },
            label: line.label(),
        })
        .collect();
    Json(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{InMemoryFactsRepository, InMemoryNotificationSink};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use coverage_advisor::config::AdvisorConfig;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn app(ready: bool) -> axum::Router {
        let service = Arc::new(AdvisoryService::new(
            Arc::new(InMemoryFactsRepository::default()),
            Arc::new(InMemoryNotificationSink::default()),
            AdvisorConfig::default(),
        ));
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_advisory_routes(service).layer(Extension(state))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&bytes).expect("json body")
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = app(false).oneshot(get("/health")).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn readiness_follows_flag() {
        let response = app(false).oneshot(get("/ready")).await.expect("response");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(response).await["status"], "initializing");

        let response = app(true).oneshot(get("/ready")).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn lines_are_listed_with_codes() {
        let response = app(true)
            .oneshot(get("/api/v1/lines"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body[0]["id"], "responsabilidad_civil");
        assert_eq!(body[0]["code"], "rc");
        assert_eq!(body[1]["label"], "Daños Materiales");
    }

    #[tokio::test]
    async fn advisory_routes_are_mounted() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/recommendations/rc")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({ "company": { "billing": 400_000 } }).to_string(),
            ))
            .expect("request");

        let response = app(true).oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["limits"]["general_limit"], "600.000€");
    }
}
