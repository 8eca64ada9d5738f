//! Prometheus Metrics Module
//!
//! Provides application-wide metrics collection using Prometheus.
//!
//! # Metrics Collected
//! - HTTP request counts by method, path, and status
//! - HTTP request latency histograms
//! - Messages appended by type
//! - Attachment upload outcomes and latency
//! - Roster changes by kind

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

const NAMESPACE: &str = "roomchat";

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// HTTP request counter - tracks total requests by method, path, and status code
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests").namespace(NAMESPACE),
        &["method", "path", "status"],
    )
    .expect("Failed to create HTTP_REQUESTS_TOTAL metric")
});

/// HTTP request latency histogram - tracks request duration in seconds
pub static HTTP_REQUEST_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let buckets = vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];
    HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        )
        .namespace(NAMESPACE)
        .buckets(buckets),
        &["method", "path"],
    )
    .expect("Failed to create HTTP_REQUEST_DURATION_SECONDS metric")
});

/// Messages appended to room logs
pub static MESSAGES_APPENDED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("messages_appended_total", "Messages appended to room logs")
            .namespace(NAMESPACE),
        &["type"], // "text", "image", "file"
    )
    .expect("Failed to create MESSAGES_APPENDED_TOTAL metric")
});

/// Attachment uploads by outcome
pub static ATTACHMENT_UPLOADS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("attachment_uploads_total", "Attachment uploads by outcome")
            .namespace(NAMESPACE),
        &["backend", "outcome"], // "ok", "rejected", "unavailable", "timeout"
    )
    .expect("Failed to create ATTACHMENT_UPLOADS_TOTAL metric")
});

/// Attachment upload latency
pub static ATTACHMENT_UPLOAD_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let buckets = vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0];
    HistogramVec::new(
        HistogramOpts::new(
            "attachment_upload_duration_seconds",
            "Blob store write latency in seconds",
        )
        .namespace(NAMESPACE)
        .buckets(buckets),
        &["backend"],
    )
    .expect("Failed to create ATTACHMENT_UPLOAD_DURATION_SECONDS metric")
});

/// Roster mutations
pub static ROSTER_CHANGES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("roster_changes_total", "Room roster mutations").namespace(NAMESPACE),
        &["change"],
    )
    .expect("Failed to create ROSTER_CHANGES_TOTAL metric")
});

/// Register all metrics with the registry
fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .expect("Failed to register HTTP_REQUESTS_TOTAL");
    registry
        .register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()))
        .expect("Failed to register HTTP_REQUEST_DURATION_SECONDS");
    registry
        .register(Box::new(MESSAGES_APPENDED_TOTAL.clone()))
        .expect("Failed to register MESSAGES_APPENDED_TOTAL");
    registry
        .register(Box::new(ATTACHMENT_UPLOADS_TOTAL.clone()))
        .expect("Failed to register ATTACHMENT_UPLOADS_TOTAL");
    registry
        .register(Box::new(ATTACHMENT_UPLOAD_DURATION_SECONDS.clone()))
        .expect("Failed to register ATTACHMENT_UPLOAD_DURATION_SECONDS");
    registry
        .register(Box::new(ROSTER_CHANGES_TOTAL.clone()))
        .expect("Failed to register ROSTER_CHANGES_TOTAL");
}

/// Collect and encode all metrics as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .expect("Failed to encode metrics");
    String::from_utf8(buffer).expect("Metrics should be valid UTF-8")
}

/// Helper to record HTTP request metrics
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration_secs);
}

/// Helper to record an appended message
pub fn record_message_appended(message_type: &str) {
    MESSAGES_APPENDED_TOTAL
        .with_label_values(&[message_type])
        .inc();
}

/// Helper to record an attachment upload attempt
pub fn record_upload(backend: &str, outcome: &str, duration_secs: f64) {
    ATTACHMENT_UPLOADS_TOTAL
        .with_label_values(&[backend, outcome])
        .inc();
    ATTACHMENT_UPLOAD_DURATION_SECONDS
        .with_label_values(&[backend])
        .observe(duration_secs);
}

/// Helper to record a roster mutation
pub fn record_roster_change(change: &str) {
    ROSTER_CHANGES_TOTAL.with_label_values(&[change]).inc();
}
