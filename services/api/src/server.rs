use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use lead_scoring::config::AppConfig;
use lead_scoring::error::AppError;
use lead_scoring::scoring::classifier::GeminiClassifier;
use lead_scoring::store::JsonFileStore;
use lead_scoring::telemetry;
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

    if config.classifier.api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set; every classification will fall back to Low");
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));

    let store = JsonFileStore::new(config.storage.data_dir.clone())?;
    let classifier = GeminiClassifier::new(config.classifier.clone())?;

    let state = AppState {
        store: Arc::new(store),
        classifier: Arc::new(classifier),
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let app = routes::router()
        .layer(Extension(state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "lead scoring service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
