use std::net::SocketAddr;

use crate::model::ResourceKind;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: booking attempts. Labels: kind, outcome.
pub const BOOKINGS_TOTAL: &str = "parkd_bookings_total";

/// Histogram: end-to-end booking latency in seconds. Labels: kind.
pub const BOOKING_DURATION_SECONDS: &str = "parkd_booking_duration_seconds";

/// Counter: bookings refused because the slot was taken. Labels: kind.
pub const CONFLICTS_TOTAL: &str = "parkd_conflicts_total";

/// Counter: cancellations. Labels: kind, outcome.
pub const CANCELLATIONS_TOTAL: &str = "parkd_cancellations_total";

/// Histogram: trip-listing latency in seconds.
pub const LISTING_DURATION_SECONDS: &str = "parkd_listing_duration_seconds";

/// Counter: rows a listing dropped because they would not parse.
pub const MALFORMED_ROWS_TOTAL: &str = "parkd_malformed_rows_total";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) {
    let Some(port) = port else { return };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .expect("failed to install Prometheus metrics exporter");
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
}

/// Stable label value for a resource kind.
pub fn kind_label(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Parking => "parking",
        ResourceKind::Charging => "charging",
    }
}
