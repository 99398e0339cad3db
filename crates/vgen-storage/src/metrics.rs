//! Storage metrics collection.
//!
//! Provides standardized metrics for monitoring storage operations:
//! - Request counters by operation and status
//! - Latency histograms
//! - Media link refresh outcomes by slot

use metrics::{counter, histogram};

/// Metric name constants for consistency.
pub mod names {
    /// Total storage requests by operation and status.
    pub const REQUESTS_TOTAL: &str = "storage_requests_total";

    /// Request latency in seconds by operation.
    pub const LATENCY_SECONDS: &str = "storage_latency_seconds";

    /// Media link refresh attempts by slot and outcome.
    pub const LINK_REFRESH_TOTAL: &str = "media_link_refresh_total";
}

/// Record metrics for a completed storage request.
///
/// `status` is 0 when no HTTP response was received.
pub fn record_request(operation: &str, status: u16, latency_ms: f64) {
    counter!(
        names::REQUESTS_TOTAL,
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        names::LATENCY_SECONDS,
        "operation" => operation.to_string()
    )
    .record(latency_ms / 1000.0);
}

/// Record the outcome of one media link refresh.
pub fn record_link_refresh(slot: &'static str, outcome: &'static str) {
    counter!(
        names::LINK_REFRESH_TOTAL,
        "slot" => slot,
        "outcome" => outcome
    )
    .increment(1);
}
