use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;

use crate::error::AppError;

use super::facts::{cnae, CnaeEntry, SessionId};
use super::recommendation::{InsuranceLine, ProductTier, Recommendation};
use super::repository::{FactsRepository, NotificationSink, StoredFactsView};
use super::service::{AdvisoryService, DispatchReceipt};

const DEFAULT_CNAE_LIMIT: usize = 10;

/// Router builder exposing the recommendation engine and session endpoints.
pub fn advisory_router<R, N>(service: Arc<AdvisoryService<R, N>>) -> Router
where
    R: FactsRepository + 'static,
    N: NotificationSink + 'static,
{
    Router::new()
        .route(
            "/api/v1/recommendations/:line",
            post(evaluate_handler::<R, N>),
        )
        .route("/api/v1/products/:line", post(estimate_handler::<R, N>))
        .route(
            "/api/v1/sessions/:session_id/facts",
            put(submit_facts_handler::<R, N>),
        )
        .route(
            "/api/v1/sessions/:session_id/recommendations/:line",
            get(recommendation_handler::<R, N>),
        )
        .route(
            "/api/v1/sessions/:session_id/products/:line",
            get(products_handler::<R, N>),
        )
        .route(
            "/api/v1/sessions/:session_id/recommendations/:line/email",
            post(email_handler::<R, N>),
        )
        .route("/api/v1/cnae", get(cnae_handler))
        .with_state(service)
}

fn parse_line(raw: &str) -> Result<InsuranceLine, AppError> {
    Ok(raw.parse::<InsuranceLine>()?)
}

pub(crate) async fn evaluate_handler<R, N>(
    State(service): State<Arc<AdvisoryService<R, N>>>,
    Path(line): Path<String>,
    Json(raw): Json<Value>,
) -> Result<Json<Recommendation>, AppError>
where
    R: FactsRepository + 'static,
    N: NotificationSink + 'static,
{
    let line = parse_line(&line)?;
    Ok(Json(service.evaluate(&raw, line)))
}

pub(crate) async fn estimate_handler<R, N>(
    State(service): State<Arc<AdvisoryService<R, N>>>,
    Path(line): Path<String>,
    Json(raw): Json<Value>,
) -> Result<Json<[ProductTier; 3]>, AppError>
where
    R: FactsRepository + 'static,
    N: NotificationSink + 'static,
{
    let line = parse_line(&line)?;
    Ok(Json(service.estimate(&raw, line)))
}

pub(crate) async fn submit_facts_handler<R, N>(
    State(service): State<Arc<AdvisoryService<R, N>>>,
    Path(session_id): Path<String>,
    Json(raw): Json<Value>,
) -> Result<(StatusCode, Json<StoredFactsView>), AppError>
where
    R: FactsRepository + 'static,
    N: NotificationSink + 'static,
{
    let strict = service.config().strict_facts;
    let stored = service.submit_facts(SessionId(session_id), &raw)?;
    Ok((StatusCode::ACCEPTED, Json(stored.status_view(strict))))
}

pub(crate) async fn recommendation_handler<R, N>(
    State(service): State<Arc<AdvisoryService<R, N>>>,
    Path((session_id, line)): Path<(String, String)>,
) -> Result<Json<Recommendation>, AppError>
where
    R: FactsRepository + 'static,
    N: NotificationSink + 'static,
{
    let line = parse_line(&line)?;
    let recommendation = service.recommendation(&SessionId(session_id), line)?;
    Ok(Json(recommendation))
}

pub(crate) async fn products_handler<R, N>(
    State(service): State<Arc<AdvisoryService<R, N>>>,
    Path((session_id, line)): Path<(String, String)>,
) -> Result<Json<[ProductTier; 3]>, AppError>
where
    R: FactsRepository + 'static,
    N: NotificationSink + 'static,
{
    let line = parse_line(&line)?;
    let tiers = service.product_tiers(&SessionId(session_id), line)?;
    Ok(Json(tiers))
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmailRequest {
    recipient: String,
}

pub(crate) async fn email_handler<R, N>(
    State(service): State<Arc<AdvisoryService<R, N>>>,
    Path((session_id, line)): Path<(String, String)>,
    Json(request): Json<EmailRequest>,
) -> Result<(StatusCode, Json<DispatchReceipt>), AppError>
where
    R: FactsRepository + 'static,
    N: NotificationSink + 'static,
{
    let line = parse_line(&line)?;
    let receipt = service.send_recommendation(&SessionId(session_id), line, &request.recipient)?;
    Ok((StatusCode::ACCEPTED, Json(receipt)))
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CnaeQuery {
    #[serde(default)]
    q: String,
    limit: Option<usize>,
}

pub(crate) async fn cnae_handler(Query(query): Query<CnaeQuery>) -> Json<Vec<&'static CnaeEntry>> {
    Json(cnae::search(&query.q, query.limit.unwrap_or(DEFAULT_CNAE_LIMIT)))
}
