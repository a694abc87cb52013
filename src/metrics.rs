use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Build the Prometheus recorder, install it as the global recorder and
/// register all engine counters. Returns a `PrometheusHandle` whose
/// `render()` produces the text/plain scrape payload.
///
/// If a global recorder is already installed (e.g. a second router in the
/// same test binary) the returned handle renders an empty registry.
pub fn init_metrics() -> PrometheusHandle {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();

    if metrics::set_global_recorder(recorder).is_err() {
        tracing::debug!("Metrics recorder already installed");
    }

    // Pre-register counters so they appear even before the first increment.
    counter!("fee_quotes_total").absolute(0);
    counter!("level_lookups_total").absolute(0);
    counter!("evolutions_total").absolute(0);
    counter!("badges_awarded_total").absolute(0);
    counter!("collection_scores_total").absolute(0);

    handle
}
