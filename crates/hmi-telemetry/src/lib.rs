//! # HMI Telemetry
//!
//! Logging and metrics for HMI bus components.
//!
//! ## Components
//!
//! - **Logs**: `tracing` events rendered by `tracing-subscriber`, either
//!   human-readable or JSON (one object per line).
//! - **Metrics**: Prometheus counters and histograms in a process-wide
//!   registry, exposed in text format through [`encode_metrics`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hmi_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let _guard = init_telemetry(TelemetryConfig::from_env()).expect("telemetry");
//!     // Component code here
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `HMI_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `HMI_JSON_LOGS` | `false` | Emit JSON formatted logs |
//! | `HMI_CONSOLE_OUTPUT` | `true` | Write logs to stderr at all |
//! | `HMI_COMPONENT` | `hmi` | Component name attached to logs |

mod config;
mod logging;
pub mod metrics;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use metrics::{
    encode_metrics, register_metrics, MetricsHandle, RC_DROPPED, RC_ERRORS, RC_NOTIFICATIONS,
    RC_REQUESTS, RC_REQUEST_DURATION,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Install the log subscriber and register metrics.
///
/// Returns a guard that must be held for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let metrics = register_metrics()?;
    tracing_setup::init_tracing(&config)?;

    tracing::info!(
        component = %config.component,
        json_logs = config.json_logs,
        "Telemetry initialized"
    );

    Ok(TelemetryGuard {
        component: config.component,
        _metrics: metrics,
    })
}

/// Keeps telemetry active for the life of the process.
pub struct TelemetryGuard {
    component: String,
    _metrics: MetricsHandle,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(component = %self.component, "Shutting down telemetry");
    }
}

/// Increment a counter, optionally with label values.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TelemetryConfig::default();
        assert_eq!(config.component, "hmi");
    }

    #[test]
    fn test_metric_inc_macro() {
        metric_inc!(RC_DROPPED, &["test_macro"]);
        assert!(RC_DROPPED.with_label_values(&["test_macro"]).get() >= 1.0);
    }
}
