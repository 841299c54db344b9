//! Dispatcher metrics definitions
//!
//! OpenTelemetry instruments recorded by a dispatcher built with
//! `DispatcherBuilder::with_metrics()`. They are exported by whatever meter
//! provider the application installed, see `jrd_core::init_observability`.
//!
//! # Metrics Collected
//!
//! - **requests_total**: Dispatched requests by method and status (counter)
//! - **request_duration**: Time from raw text to framed outcome (histogram)
//! - **errors_total**: Error outcomes by JSON-RPC code (counter)
//! - **notifications_total**: Requests without an id, by method (counter)
//!
//! # Examples
//!
//! ```rust
//! use jrd_dispatch::DispatchMetrics;
//!
//! let metrics = DispatchMetrics::new("my-service");
//! metrics.record_request("add", "success", 0.002);
//! metrics.record_error(-32601);
//! ```

use opentelemetry::{
    global,
    metrics::{Counter, Histogram, Meter},
    KeyValue,
};

/// Method label used when the envelope was rejected before a method was read
pub const UNKNOWN_METHOD: &str = "<invalid>";

/// Dispatcher metrics
///
/// All instruments are prefixed with `jrd.dispatch.*`.
pub struct DispatchMetrics {
    /// Total number of requests dispatched
    pub requests_total: Counter<u64>,
    /// Dispatch duration in seconds
    pub request_duration: Histogram<f64>,
    /// Total number of error outcomes
    pub errors_total: Counter<u64>,
    /// Total number of notifications
    pub notifications_total: Counter<u64>,
}

impl DispatchMetrics {
    /// Create metrics from the global meter provider
    pub fn new(scope: &'static str) -> Self {
        let meter = global::meter(scope);
        Self::new_with_meter(&meter)
    }

    /// Create metrics from a specific meter
    pub fn new_with_meter(meter: &Meter) -> Self {
        Self {
            requests_total: meter
                .u64_counter("jrd.dispatch.requests.total")
                .with_description("Total number of requests dispatched")
                .build(),
            request_duration: meter
                .f64_histogram("jrd.dispatch.request.duration")
                .with_description("Request dispatch duration in seconds")
                .with_unit("s")
                .build(),
            errors_total: meter
                .u64_counter("jrd.dispatch.errors.total")
                .with_description("Total number of error outcomes")
                .build(),
            notifications_total: meter
                .u64_counter("jrd.dispatch.notifications.total")
                .with_description("Total number of notifications dispatched")
                .build(),
        }
    }

    /// Record a dispatched request
    pub fn record_request(&self, method: &str, status: &str, duration_secs: f64) {
        let attributes = &[
            KeyValue::new("method", method.to_string()),
            KeyValue::new("status", status.to_string()),
        ];
        self.requests_total.add(1, attributes);
        self.request_duration.record(duration_secs, attributes);
    }

    /// Record an error outcome
    pub fn record_error(&self, code: i32) {
        self.errors_total
            .add(1, &[KeyValue::new("code", i64::from(code))]);
    }

    /// Record a notification
    pub fn record_notification(&self, method: &str) {
        self.notifications_total
            .add(1, &[KeyValue::new("method", method.to_string())]);
    }
}

impl std::fmt::Debug for DispatchMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchMetrics").finish_non_exhaustive()
    }
}
