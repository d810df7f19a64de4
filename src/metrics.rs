use std::net::SocketAddr;
use tracing::{info, warn};

pub const GEO_LOOKUPS_TOTAL: &str = "villes_geo_lookups_total";
pub const RATING_LOOKUPS_TOTAL: &str = "villes_rating_lookups_total";

/// Installs the Prometheus exporter when a listen address is configured.
///
/// Without an exporter the counters below are no-ops.
pub fn init_metrics(addr: Option<&str>) {
    let Some(addr) = addr else {
        return;
    };
    let addr: SocketAddr = match addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!("Invalid metrics address '{}': {}", addr, e);
            return;
        }
    };

    let builder = metrics_exporter_prometheus::PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => info!("Prometheus exporter listening on http://{}/metrics", addr),
        Err(e) => warn!("Prometheus exporter install failed (possibly already installed): {}", e),
    }
}

pub fn record_geo_lookup(outcome: &'static str) {
    ::metrics::counter!(GEO_LOOKUPS_TOTAL, "outcome" => outcome).increment(1);
}

pub fn record_rating_lookup(outcome: &'static str) {
    ::metrics::counter!(RATING_LOOKUPS_TOTAL, "outcome" => outcome).increment(1);
}
