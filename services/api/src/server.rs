use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryCaseRepository, InMemoryFeedbackPublisher};
use crate::routes::with_case_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Utc;
use collections_ai::config::AppConfig;
use collections_ai::error::AppError;
use collections_ai::telemetry;
use collections_ai::workflows::collections::CaseAssistantService;
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

    let repository = Arc::new(InMemoryCaseRepository::seeded(Utc::now()));
    let feedback = Arc::new(InMemoryFeedbackPublisher::default());
    let service = Arc::new(CaseAssistantService::new(
        repository,
        feedback,
        config.engine,
    ));

    let app = with_case_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        max_suggestions = config.engine.max_suggestions,
        "collections copilot ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
