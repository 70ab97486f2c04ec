use crate::cli::ServeArgs;
use crate::infra::{AppState, JsonFileAssessmentRepository};
use crate::routes::with_assessment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use digi_assess::assessment::{AssessmentService, AssessmentServiceError, Catalogs};
use digi_assess::config::AppConfig;
use digi_assess::error::AppError;
use digi_assess::telemetry;
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
    if let Some(data_dir) = args.data_dir.take() {
        config.storage.data_dir = data_dir;
    }

    telemetry::init(&config.telemetry)?;

    let catalogs = Arc::new(Catalogs::initialize(&config.catalog_config())?);

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = JsonFileAssessmentRepository::open(&config.storage.data_dir)
        .map_err(AssessmentServiceError::from)?;
    let assessment_service = Arc::new(AssessmentService::new(catalogs, Arc::new(repository)));

    let app = with_assessment_routes(assessment_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        data_dir = %config.storage.data_dir.display(),
        "digital maturity assessment service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
