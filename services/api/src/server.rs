use crate::cli::ServeArgs;
use crate::infra::{load_tables, AppState, InMemoryLeadSink};
use crate::routes::with_salary_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use salary_insights::config::AppConfig;
use salary_insights::error::AppError;
use salary_insights::estimation::{
    CsvLeadLog, PlainTextReportRenderer, SalaryEstimationService, SalaryEstimator,
};
use salary_insights::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
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

    let tables = load_tables(&config.reference_data)?;
    let estimator = SalaryEstimator::new(tables);
    let renderer = Arc::new(PlainTextReportRenderer::new());

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let router = match &config.leads.csv_path {
        Some(path) => {
            let ledger = Arc::new(CsvLeadLog::open(path)?);
            info!(path = %path.display(), "recording leads to csv ledger");
            with_salary_routes(Arc::new(SalaryEstimationService::new(
                estimator, ledger, renderer,
            )))
        }
        None => {
            let sink = Arc::new(InMemoryLeadSink::default());
            with_salary_routes(Arc::new(SalaryEstimationService::new(
                estimator, sink, renderer,
            )))
        }
    };

    let app = router
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "salary insights service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
