//! Metrics recorder feeding both the in-process counters and the Prometheus
//! registry.

use std::time::Duration;

use hmi_telemetry::{metric_inc, RC_DROPPED, RC_ERRORS, RC_NOTIFICATIONS, RC_REQUESTS};
use hmi_telemetry::RC_REQUEST_DURATION;
use hmi_types::ResultCode;
use rc_remote_control::{DropReason, Metrics, MetricsRecorder, MetricsSnapshot};

/// Records every RC event twice: atomics for the shutdown summary,
/// Prometheus for scraping.
#[derive(Default)]
pub struct RuntimeMetrics {
    local: Metrics,
}

impl RuntimeMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.local.snapshot()
    }
}

impl MetricsRecorder for RuntimeMetrics {
    fn record_request(&self, method: &str, duration: Duration) {
        MetricsRecorder::record_request(&self.local, method, duration);
        metric_inc!(RC_REQUESTS, &[method]);
        RC_REQUEST_DURATION
            .with_label_values(&[method])
            .observe(duration.as_secs_f64());
    }

    fn record_error(&self, code: ResultCode) {
        MetricsRecorder::record_error(&self.local, code);
        metric_inc!(RC_ERRORS, &[code.as_str()]);
    }

    fn record_notification(&self, method: &str) {
        MetricsRecorder::record_notification(&self.local, method);
        metric_inc!(RC_NOTIFICATIONS, &[method]);
    }

    fn record_dropped(&self, reason: DropReason) {
        MetricsRecorder::record_dropped(&self.local, reason);
        metric_inc!(RC_DROPPED, &[reason.as_str()]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_locally_and_in_prometheus() {
        let metrics = RuntimeMetrics::new();
        metrics.record_request("RC.IsReady", Duration::from_micros(40));
        metrics.record_error(ResultCode::Rejected);
        metrics.record_dropped(DropReason::UnknownMethod);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.requests_dispatched, 1);
        assert_eq!(snapshot.consent_rejections, 1);
        assert_eq!(snapshot.frames_dropped, 1);

        assert!(RC_REQUESTS.with_label_values(&["RC.IsReady"]).get() >= 1.0);
        assert!(RC_ERRORS.with_label_values(&["REJECTED"]).get() >= 1.0);
        assert!(RC_DROPPED.with_label_values(&["unknown_method"]).get() >= 1.0);
    }
}
