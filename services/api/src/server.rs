use crate::cli::ServeArgs;
use crate::infra::{AppState, ReportState};
use crate::routes::readiness_router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use dept_readiness::config::AppConfig;
use dept_readiness::error::AppError;
use dept_readiness::telemetry;
use dept_readiness::workflows::{FileSheetSource, ReadinessPipeline};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

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

    if config.sources.vendor_csv.is_none() || config.sources.internal_csv.is_none() {
        warn!("sheet locations not configured; GET /api/v1/readiness/report will fail");
    }
    let source = FileSheetSource::new(
        config.sources.vendor_csv.clone(),
        config.sources.internal_csv.clone(),
    );
    let pipeline = Arc::new(ReadinessPipeline::new(config.rules.clone()));
    let report_state = Arc::new(ReportState::new(pipeline, source));

    let app = readiness_router(report_state)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "department readiness service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
