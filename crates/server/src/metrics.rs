//! Application metrics for Prometheus monitoring.
//!
//! This module provides:
//! - Prometheus metrics recorder initialization
//! - Metric definitions
//! - Helper functions for recording metrics

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

/// Global Prometheus handle for rendering metrics.
static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize the Prometheus metrics recorder.
///
/// Call once at startup, before any metrics are recorded.
/// Returns `true` if initialization succeeded, `false` if already initialized.
pub fn init_metrics() -> bool {
    if PROMETHEUS_HANDLE.get().is_some() {
        return false;
    }

    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();

    if metrics::set_global_recorder(recorder).is_err() {
        tracing::warn!("Failed to set global metrics recorder (already set)");
        return false;
    }

    if PROMETHEUS_HANDLE.set(handle).is_err() {
        tracing::warn!("Failed to store Prometheus handle (already set)");
    }

    describe_metrics();

    tracing::info!("Prometheus metrics initialized");
    true
}

fn describe_metrics() {
    describe_counter!("gainz_requests_total", "Total number of API requests");
    describe_histogram!(
        "gainz_request_duration_seconds",
        "Duration of API requests in seconds"
    );
    describe_histogram!(
        "gainz_stats_aggregation_seconds",
        "Time spent reducing a user snapshot into stats"
    );
}

/// Render current metrics in Prometheus text format.
///
/// Returns `None` if metrics are not initialized.
pub fn render_metrics() -> Option<String> {
    PROMETHEUS_HANDLE.get().map(|h| h.render())
}

/// Record a completed API request.
///
/// * `endpoint` - The API endpoint name (e.g., "user_stats")
/// * `status` - HTTP status code as string (e.g., "200", "401", "500")
pub fn record_request(endpoint: &str, status: &str, duration: Duration) {
    counter!("gainz_requests_total", "endpoint" => endpoint.to_string(), "status" => status.to_string())
        .increment(1);
    histogram!("gainz_request_duration_seconds", "endpoint" => endpoint.to_string())
        .record(duration.as_secs_f64());
}

pub fn record_aggregation(duration: Duration) {
    histogram!("gainz_stats_aggregation_seconds").record(duration.as_secs_f64());
}

/// Helper for timing request handlers.
///
/// ```ignore
/// let timer = RequestTimer::new("user_stats");
/// // ... do work ...
/// timer.finish_ok(); // or timer.finish_err(status_code)
/// ```
pub struct RequestTimer {
    endpoint: &'static str,
    start: Instant,
}

impl RequestTimer {
    pub fn new(endpoint: &'static str) -> Self {
        Self {
            endpoint,
            start: Instant::now(),
        }
    }

    pub fn finish_ok(self) {
        record_request(self.endpoint, "200", self.start.elapsed());
    }

    pub fn finish_err(self, status: u16) {
        record_request(self.endpoint, &status.to_string(), self.start.elapsed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_timer() {
        // Recording without an installed recorder is a no-op and must not panic
        let timer = RequestTimer::new("test_endpoint");
        std::thread::sleep(Duration::from_millis(1));
        timer.finish_ok();
        RequestTimer::new("test_endpoint").finish_err(401);
        record_aggregation(Duration::from_micros(5));
    }

    #[test]
    fn test_init_metrics_then_render() {
        init_metrics();
        assert!(!init_metrics(), "second init should report already initialized");

        record_request("user_stats", "200", Duration::from_millis(3));
        let output = render_metrics().expect("metrics initialized");
        assert!(output.contains("gainz_requests_total"));
    }
}
