use crate::cli::ServeArgs;
use crate::infra::{load_price_configuration, AppState};
use crate::routes::with_quote_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use diag_quote::config::AppConfig;
use diag_quote::error::AppError;
use diag_quote::pricing::QuoteEngine;
use diag_quote::telemetry;
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
    if let Some(path) = args.price_table.take() {
        config.pricing.price_table = Some(path);
    }
    if let Some(method) = args.scaling {
        config.pricing.scaling_method = method;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let prices = load_price_configuration(&config.pricing)?;
    let engine = Arc::new(
        QuoteEngine::new(Arc::new(prices)).with_default_scaling(config.pricing.scaling_method),
    );

    let app = with_quote_routes(engine)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        scaling = ?config.pricing.scaling_method,
        "diagnostic quote service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
