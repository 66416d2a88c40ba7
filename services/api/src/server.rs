use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryFactsRepository, InMemoryNotificationSink};
use crate::routes::with_advisory_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use coverage_advisor::advisory::AdvisoryService;
use coverage_advisor::config::AppConfig;
use coverage_advisor::error::AppError;
use coverage_advisor::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryFactsRepository::default());
    let notifications = Arc::new(InMemoryNotificationSink::default());
    let advisory_service = Arc::new(AdvisoryService::new(
        repository,
        notifications,
        config.advisor,
    ));

    let app = with_advisory_routes(advisory_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        strict_facts = config.advisor.strict_facts,
        "coverage advisor ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
