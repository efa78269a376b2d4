//! Metrics and observability utilities
//!
//! Provides Prometheus metrics with standardized naming conventions.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all Morshed metrics
pub const METRICS_PREFIX: &str = "morshed";

/// Register all metric descriptions
pub fn register_metrics() {
    // Request metrics
    describe_counter!(
        format!("{}_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of HTTP requests"
    );

    describe_histogram!(
        format!("{}_request_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "HTTP request latency in seconds"
    );

    // Search metrics
    describe_counter!(
        format!("{}_professor_searches_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of professor searches"
    );

    describe_gauge!(
        format!("{}_search_results_count", METRICS_PREFIX),
        Unit::Count,
        "Number of results returned from the last search"
    );

    // Submission metrics
    describe_counter!(
        format!("{}_reviews_submitted_total", METRICS_PREFIX),
        Unit::Count,
        "Total reviews accepted"
    );

    describe_counter!(
        format!("{}_reviews_rejected_total", METRICS_PREFIX),
        Unit::Count,
        "Total reviews rejected by validation or moderation"
    );

    describe_counter!(
        format!("{}_professors_submitted_total", METRICS_PREFIX),
        Unit::Count,
        "Total professor submissions received"
    );

    // Rankings metrics
    describe_counter!(
        format!("{}_rankings_computed_total", METRICS_PREFIX),
        Unit::Count,
        "Total ranking computations"
    );

    describe_histogram!(
        format!("{}_rankings_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Ranking computation latency in seconds"
    );

    // Cache metrics
    describe_counter!(
        format!("{}_cache_hits_total", METRICS_PREFIX),
        Unit::Count,
        "Total cache hits"
    );

    describe_counter!(
        format!("{}_cache_misses_total", METRICS_PREFIX),
        Unit::Count,
        "Total cache misses"
    );

    tracing::info!("Metrics registered");
}

/// Helper to record request metrics
pub struct RequestMetrics {
    start: Instant,
    endpoint: String,
    method: String,
}

impl RequestMetrics {
    /// Start tracking a request
    pub fn start(method: &str, endpoint: &str) -> Self {
        Self {
            start: Instant::now(),
            endpoint: endpoint.to_string(),
            method: method.to_string(),
        }
    }

    /// Record request completion
    pub fn finish(self, status: u16) {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            format!("{}_requests_total", METRICS_PREFIX),
            "method" => self.method.clone(),
            "endpoint" => self.endpoint.clone(),
            "status" => status.to_string()
        )
        .increment(1);

        histogram!(
            format!("{}_request_duration_seconds", METRICS_PREFIX),
            "method" => self.method,
            "endpoint" => self.endpoint
        )
        .record(duration);
    }
}

/// Helper to record search metrics
pub fn record_search(result_count: usize) {
    counter!(format!("{}_professor_searches_total", METRICS_PREFIX)).increment(1);
    gauge!(format!("{}_search_results_count", METRICS_PREFIX)).set(result_count as f64);
}

/// Helper to record a review submission outcome
pub fn record_review(accepted: bool) {
    if accepted {
        counter!(format!("{}_reviews_submitted_total", METRICS_PREFIX)).increment(1);
    } else {
        counter!(format!("{}_reviews_rejected_total", METRICS_PREFIX)).increment(1);
    }
}

/// Helper to record a professor submission
pub fn record_professor_submission(outcome: &str) {
    counter!(
        format!("{}_professors_submitted_total", METRICS_PREFIX),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Helper to record a rankings computation
pub fn record_rankings(duration_secs: f64, review_count: usize) {
    counter!(format!("{}_rankings_computed_total", METRICS_PREFIX)).increment(1);
    histogram!(format!("{}_rankings_duration_seconds", METRICS_PREFIX)).record(duration_secs);
    gauge!(format!("{}_rankings_review_rows", METRICS_PREFIX)).set(review_count as f64);
}

/// Helper to record cache metrics
pub fn record_cache(hit: bool, cache_name: &str) {
    if hit {
        counter!(
            format!("{}_cache_hits_total", METRICS_PREFIX),
            "cache" => cache_name.to_string()
        )
        .increment(1);
    } else {
        counter!(
            format!("{}_cache_misses_total", METRICS_PREFIX),
            "cache" => cache_name.to_string()
        )
        .increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_metrics() {
        let metrics = RequestMetrics::start("GET", "/v1/rankings/professors");
        std::thread::sleep(std::time::Duration::from_millis(10));
        metrics.finish(200);
        // Just verify it runs without panic
    }

    #[test]
    fn test_record_helpers_do_not_panic() {
        record_search(3);
        record_review(true);
        record_review(false);
        record_professor_submission("pending");
        record_rankings(0.01, 42);
        record_cache(true, "rankings");
    }
}
