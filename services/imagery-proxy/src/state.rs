//! Application state for the imagery proxy.

use anyhow::Result;
use metrics_exporter_prometheus::PrometheusHandle;

use crate::config::ProxyConfig;
use crate::upstream::EosdaClient;

/// Shared application state.
pub struct AppState {
    pub config: ProxyConfig,

    /// Provider client holding the API key.
    pub upstream: EosdaClient,

    /// Absent when no recorder was installed (tests).
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(config: ProxyConfig, prometheus: Option<PrometheusHandle>) -> Result<Self> {
        let upstream = EosdaClient::new(&config.imagery, config.request_timeout())?;
        Ok(Self {
            config,
            upstream,
            prometheus,
        })
    }
}
