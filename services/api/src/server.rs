use crate::cli::ServeArgs;
use crate::infra::{build_engine, AppState};
use crate::routes::{cors_layer, with_assignment_routes};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use technician_ai::config::{AppConfig, AppEnvironment};
use technician_ai::error::{self, AppError};
use technician_ai::telemetry;
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
    error::expose_internal_errors(config.environment != AppEnvironment::Production);

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let engine_config = config.clone();
    let engine =
        Arc::new(tokio::task::spawn_blocking(move || build_engine(&engine_config)).await??);
    let scorer = engine.scorer().kind();
    let directory = engine.directory().label();

    let app = with_assignment_routes(engine)
        .layer(Extension(app_state))
        .layer(prometheus_layer)
        .layer(cors_layer());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        environment = config.environment.label(),
        %addr,
        scorer,
        directory,
        "technician assignment service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
