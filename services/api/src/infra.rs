use lead_scoring::scoring::classifier::IntentClassifier;
use lead_scoring::store::DocumentStore;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) store: Arc<dyn DocumentStore>,
    pub(crate) classifier: Arc<dyn IntentClassifier>,
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}
