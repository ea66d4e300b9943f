//! Prometheus metrics for HMI bus components.
//!
//! All metrics follow the naming convention: `hmi_<component>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry,
    TextEncoder,
};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // REMOTE CONTROL METRICS
    // =========================================================================

    /// Requests dispatched to a handler
    pub static ref RC_REQUESTS: CounterVec = CounterVec::new(
        Opts::new("hmi_rc_requests_total", "Total RC requests dispatched"),
        &["method"]
    ).expect("metric creation failed");

    /// Error replies sent
    pub static ref RC_ERRORS: CounterVec = CounterVec::new(
        Opts::new("hmi_rc_errors_total", "Total RC error replies by result code"),
        &["code"]
    ).expect("metric creation failed");

    /// Notifications emitted
    pub static ref RC_NOTIFICATIONS: CounterVec = CounterVec::new(
        Opts::new("hmi_rc_notifications_total", "Total RC notifications sent"),
        &["method"]
    ).expect("metric creation failed");

    /// Inbound frames dropped without a reply
    pub static ref RC_DROPPED: CounterVec = CounterVec::new(
        Opts::new("hmi_rc_dropped_total", "Total RC frames dropped without reply"),
        &["reason"]  // malformed, unknown_method, send_failed
    ).expect("metric creation failed");

    /// Request handling latency
    pub static ref RC_REQUEST_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "hmi_rc_request_duration_seconds",
            "Time spent handling one RC request"
        ).buckets(exponential_buckets(0.00001, 2.0, 14).expect("bucket creation failed")),
        &["method"]
    ).expect("metric creation failed");
}

/// Keeps the registry alive.
pub struct MetricsHandle {
    _registry: Arc<Registry>,
}

/// Register all metrics with the global registry.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(RC_REQUESTS.clone()),
        Box::new(RC_ERRORS.clone()),
        Box::new(RC_NOTIFICATIONS.clone()),
        Box::new(RC_DROPPED.clone()),
        Box::new(RC_REQUEST_DURATION.clone()),
    ];

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }

    Ok(MetricsHandle {
        _registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_encode() {
        // A second registration in the same process fails; either outcome is fine here.
        let _ = register_metrics();
        RC_REQUESTS.with_label_values(&["RC.IsReady"]).inc();

        let text = encode_metrics().unwrap();
        assert!(text.contains("hmi_rc_requests_total"));
    }

    #[test]
    fn test_counter_increment() {
        RC_ERRORS.with_label_values(&["REJECTED"]).inc();
        assert!(RC_ERRORS.with_label_values(&["REJECTED"]).get() >= 1.0);
    }

    #[test]
    fn test_histogram_observe() {
        RC_REQUEST_DURATION
            .with_label_values(&["RC.GetCapabilities"])
            .observe(0.0001);
        assert!(
            RC_REQUEST_DURATION
                .with_label_values(&["RC.GetCapabilities"])
                .get_sample_count()
                >= 1
        );
    }
}
