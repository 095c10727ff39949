//! Metrics endpoint handler.

use axum::{extract::State, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

use crate::cache::DerivedKeyCache;

/// Estado del endpoint /metrics.
#[derive(Clone)]
pub struct MetricsState {
    pub prometheus: PrometheusHandle,
    pub cache: DerivedKeyCache,
}

/// Handler para el endpoint /metrics
pub async fn metrics_handler(State(state): State<MetricsState>) -> impl IntoResponse {
    state.cache.refresh_entry_gauge();
    state.prometheus.render()
}
