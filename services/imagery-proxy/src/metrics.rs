//! Prometheus counters for proxied and resolved requests.

use anyhow::{Context, Result};
use imagery_common::{AnalysisKind, ImageryProduct};
use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the global Prometheus recorder.
///
/// Can only succeed once per process.
pub fn install_recorder() -> Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")
}

pub fn record_imagery_request(product: ImageryProduct) {
    counter!("imagery_requests_total", "product" => product.as_str()).increment(1);
}

pub fn record_terrain_request(kind: AnalysisKind) {
    counter!("terrain_requests_total", "format" => kind.as_str()).increment(1);
}

pub fn record_scene_search() {
    counter!("scene_search_requests_total").increment(1);
}

pub fn record_upstream_error(kind: &'static str) {
    counter!("upstream_errors_total", "kind" => kind).increment(1);
}

pub fn record_pipeline_resolution() {
    counter!("pipeline_resolutions_total").increment(1);
}
