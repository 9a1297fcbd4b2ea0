use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryHostBackend, InMemoryListingBackend};
use crate::routes::with_workflow_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use outfitter::config::AppConfig;
use outfitter::error::AppError;
use outfitter::telemetry;
use outfitter::workflows::host::HostWorkflow;
use outfitter::workflows::listing::ListingWorkflow;
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

    let listing_backend = Arc::new(InMemoryListingBackend::default());
    let listing_workflow = Arc::new(ListingWorkflow::new(listing_backend));
    let host_backend = Arc::new(InMemoryHostBackend::default());
    let host_workflow = Arc::new(HostWorkflow::new(host_backend));

    let app = with_workflow_routes(listing_workflow, host_workflow)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "outfitter marketplace api ready");

    axum::serve(listener, app).await?;
    Ok(())
}
