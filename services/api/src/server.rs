use crate::cli::ServeArgs;
use crate::infra::{wizard_policy, AppState, InMemoryScreeningRepository, StaticIdentityProvider};
use crate::routes::with_screening_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use neuroscreen::config::AppConfig;
use neuroscreen::error::AppError;
use neuroscreen::telemetry;
use neuroscreen::workflows::screening::{ScreeningService, ScreeningState};
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

    let repository = Arc::new(InMemoryScreeningRepository::default());
    let identity = Arc::new(StaticIdentityProvider::from_env());
    let service = ScreeningService::new(repository, identity, config.screening.processing_delay());
    let screening_state = Arc::new(ScreeningState {
        service,
        policy: wizard_policy(&config.screening),
    });

    let app = with_screening_routes(screening_state)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "screening service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
