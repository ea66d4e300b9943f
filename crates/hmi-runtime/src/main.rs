//! HMI runtime entry point.
//!
//! ```text
//! echo '{"jsonrpc":"2.0","id":1,"method":"RC.IsReady"}' | hmi-runtime
//! ```

use anyhow::Context;
use hmi_runtime::{forward_outbound, RcRuntime, RuntimeConfig};
use hmi_telemetry::{encode_metrics, init_telemetry, TelemetryConfig};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _telemetry = init_telemetry(TelemetryConfig::for_component("RC"))
        .context("failed to initialize telemetry")?;

    let config = RuntimeConfig::from_env().context("invalid runtime configuration")?;
    let runtime = RcRuntime::start(&config)
        .await
        .context("failed to start RC component")?;

    let printer = tokio::spawn(forward_outbound(
        runtime.bus().subscribe_outbound(),
        |frame| println!("{}", frame),
    ));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if let Err(e) = runtime.feed_line(&line) {
                        warn!(error = %e, "Inbound frame rejected");
                    }
                }
                Ok(None) => {
                    info!("Input closed");
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to read input");
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    let snapshot = runtime.shutdown().await.context("RC component failed")?;
    printer.await.context("outbound printer failed")?;

    info!(
        requests = snapshot.requests_dispatched,
        errors = snapshot.error_replies,
        rejections = snapshot.consent_rejections,
        notifications = snapshot.notifications_sent,
        dropped = snapshot.frames_dropped,
        avg_request_ns = snapshot.avg_request_ns,
        "RC runtime stopped"
    );
    match encode_metrics() {
        Ok(text) => debug!(metrics = %text, "Final metrics"),
        Err(e) => warn!(error = %e, "Failed to encode metrics"),
    }

    Ok(())
}
