pub mod api;
pub mod config;
pub mod errors;
pub mod gamification;
pub mod metrics;
pub mod models;
pub mod trading;

use metrics_exporter_prometheus::PrometheusHandle;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    /// `None` when metrics are disabled.
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let metrics_handle = config.metrics_enabled.then(crate::metrics::init_metrics);
        Self {
            config,
            metrics_handle,
        }
    }
}
