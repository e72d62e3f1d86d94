use crate::cli::ServeArgs;
use crate::driver;
use crate::infra::{
    default_leverage_config, AnalysisContext, AppState, InMemoryCaseRepository,
    StaticDirectoryLookup, TracingDispatcher,
};
use crate::routes::with_dispute_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

use dispute_ai::config::AppConfig;
use dispute_ai::error::AppError;
use dispute_ai::telemetry;
use dispute_ai::workflows::dispute::EscalationScheduler;

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

    let repository = Arc::new(InMemoryCaseRepository::default());
    let scheduler = Arc::new(EscalationScheduler::new(repository.clone()));
    let dispatcher = Arc::new(TracingDispatcher::default());
    let analysis_context = AnalysisContext {
        lookup: Arc::new(StaticDirectoryLookup::seeded()),
        leverage: default_leverage_config(),
    };

    tokio::spawn(driver::run(
        repository,
        scheduler.clone(),
        dispatcher,
        config.driver.poll_interval(),
    ));

    let app = with_dispute_routes(scheduler)
        .layer(Extension(app_state))
        .layer(Extension(analysis_context))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "dispute escalation orchestrator ready");

    axum::serve(listener, app).await?;
    Ok(())
}
