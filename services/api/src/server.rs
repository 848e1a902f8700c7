use crate::cli::ServeArgs;
use crate::infra::{build_service, AppState};
use crate::routes::with_training_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use training_tracker::config::AppConfig;
use training_tracker::error::AppError;
use training_tracker::telemetry;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(roster) = args.roster.take() {
        config.roster.path = roster;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let service = Arc::new(build_service(&config));

    // Warm the cache; a broken roster still lets the service start and answer 503s.
    let warmup = Arc::clone(&service);
    match tokio::task::spawn_blocking(move || warmup.cache().get()).await? {
        Ok(roster) => info!(
            path = %config.roster.path.display(),
            records = roster.len(),
            "roster cache warmed"
        ),
        Err(err) => warn!(
            path = %config.roster.path.display(),
            error = %err,
            "roster not loaded at startup"
        ),
    }

    let app = with_training_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "training tracker ready");

    axum::serve(listener, app).await?;
    Ok(())
}
