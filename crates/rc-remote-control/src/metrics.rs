//! Metrics hooks for the Remote Control endpoint
//!
//! The endpoint reports every dispatched request, error reply, notification
//! and dropped frame through [`MetricsRecorder`]. [`Metrics`] keeps atomic
//! counters in-process; a Prometheus-backed recorder lives in the runtime.

use hmi_types::ResultCode;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Why an inbound frame produced no reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropReason {
    /// Failed the structural check.
    Malformed,
    /// Well-formed but not one of the known methods.
    UnknownMethod,
    /// A reply or notification could not be handed to the transport.
    SendFailed,
}

impl DropReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropReason::Malformed => "malformed",
            DropReason::UnknownMethod => "unknown_method",
            DropReason::SendFailed => "send_failed",
        }
    }
}

/// Metrics collector for the Remote Control endpoint
#[derive(Default)]
pub struct Metrics {
    /// Requests routed to a handler
    pub requests_dispatched: AtomicU64,
    /// Error replies sent
    pub error_replies: AtomicU64,
    /// Consent rejections (subset of error replies)
    pub consent_rejections: AtomicU64,
    /// Notifications sent
    pub notifications_sent: AtomicU64,
    /// Inbound frames dropped without reply
    pub frames_dropped: AtomicU64,
    /// Outbound frames the transport refused
    pub send_failures: AtomicU64,
    /// Cumulative request handling time in nanoseconds
    pub request_time_ns: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one dispatched request and its handling time
    pub fn record_request(&self, duration: Duration) {
        self.requests_dispatched.fetch_add(1, Ordering::Relaxed);
        self.request_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    pub fn record_error(&self, code: ResultCode) {
        self.error_replies.fetch_add(1, Ordering::Relaxed);
        if code == ResultCode::Rejected {
            self.consent_rejections.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_notification(&self) {
        self.notifications_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dropped(&self, reason: DropReason) {
        if reason == DropReason::SendFailed {
            self.send_failures.fetch_add(1, Ordering::Relaxed);
        } else {
            self.frames_dropped.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_dispatched: self.requests_dispatched.load(Ordering::Relaxed),
            error_replies: self.error_replies.load(Ordering::Relaxed),
            consent_rejections: self.consent_rejections.load(Ordering::Relaxed),
            notifications_sent: self.notifications_sent.load(Ordering::Relaxed),
            frames_dropped: self.frames_dropped.load(Ordering::Relaxed),
            send_failures: self.send_failures.load(Ordering::Relaxed),
            avg_request_ns: self.avg_request_time_ns(),
        }
    }

    /// Calculate average request handling time in nanoseconds
    pub fn avg_request_time_ns(&self) -> u64 {
        let total = self.request_time_ns.load(Ordering::Relaxed);
        let count = self.requests_dispatched.load(Ordering::Relaxed);
        if count > 0 {
            total / count
        } else {
            0
        }
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub requests_dispatched: u64,
    pub error_replies: u64,
    pub consent_rejections: u64,
    pub notifications_sent: u64,
    pub frames_dropped: u64,
    pub send_failures: u64,
    pub avg_request_ns: u64,
}

/// Trait for custom metrics recording implementations
///
/// Implement this trait to integrate with external metrics systems
/// like Prometheus.
pub trait MetricsRecorder: Send + Sync {
    /// Record a request routed to a handler
    fn record_request(&self, method: &str, duration: Duration);

    /// Record an error reply
    fn record_error(&self, code: ResultCode);

    /// Record a notification
    fn record_notification(&self, method: &str);

    /// Record a frame dropped without reply
    fn record_dropped(&self, reason: DropReason);
}

/// No-op metrics recorder for when metrics are disabled
#[derive(Default)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn record_request(&self, _: &str, _: Duration) {}
    fn record_error(&self, _: ResultCode) {}
    fn record_notification(&self, _: &str) {}
    fn record_dropped(&self, _: DropReason) {}
}

impl MetricsRecorder for Metrics {
    fn record_request(&self, _method: &str, duration: Duration) {
        Metrics::record_request(self, duration);
    }

    fn record_error(&self, code: ResultCode) {
        Metrics::record_error(self, code);
    }

    fn record_notification(&self, _method: &str) {
        Metrics::record_notification(self);
    }

    fn record_dropped(&self, reason: DropReason) {
        Metrics::record_dropped(self, reason);
    }
}
