//! Reply and notification encoding
//!
//! Every outbound frame the endpoint produces goes through [`ReplySender`].
//! Transport failures are logged and counted here and never propagate.

use std::sync::Arc;

use hmi_bus::BusClient;
use hmi_types::{OutboundFrame, ResultCode, RpcErrorReply, RpcId, RpcNotification, RpcResponse};
use serde_json::{json, Value};
use tracing::{debug, error};

use crate::metrics::{DropReason, MetricsRecorder};

/// Encodes replies and hands them to the bus client.
#[derive(Clone)]
pub struct ReplySender {
    client: Arc<dyn BusClient>,
    metrics: Arc<dyn MetricsRecorder>,
}

impl ReplySender {
    pub fn new(client: Arc<dyn BusClient>, metrics: Arc<dyn MetricsRecorder>) -> Self {
        Self { client, metrics }
    }

    /// Send an error reply. Emits nothing for `SUCCESS`.
    ///
    /// Returns whether a frame was sent.
    pub fn send_error(
        &self,
        code: ResultCode,
        id: &RpcId,
        method: &str,
        message: Option<&str>,
    ) -> bool {
        if code.is_success() {
            return false;
        }
        let reply = RpcErrorReply::new(id.clone(), code, method, message.map(str::to_string));
        if !self.send(reply.into()) {
            return false;
        }
        self.metrics.record_error(code);
        debug!(%id, method, %code, "Error reply sent");
        true
    }

    /// Send a bare `{code, method}` result. Emits nothing unless `SUCCESS`.
    pub fn send_rc_result(&self, code: ResultCode, id: &RpcId, method: &str) -> bool {
        if !code.is_success() {
            return false;
        }
        self.send_result(id, json!({"code": code, "method": method}))
    }

    /// Send a result payload as-is.
    pub fn send_result(&self, id: &RpcId, result: Value) -> bool {
        self.send(RpcResponse::new(id.clone(), result).into())
    }

    /// Send a notification. `method` is fully qualified.
    pub fn send_notification(&self, method: &str, params: Value) -> bool {
        if !self.send(RpcNotification::new(method, params).into()) {
            return false;
        }
        self.metrics.record_notification(method);
        true
    }

    fn send(&self, frame: OutboundFrame) -> bool {
        let method = frame.method().unwrap_or_default().to_string();
        match self.client.send(frame) {
            Ok(()) => true,
            Err(e) => {
                error!(method = %method, error = %e, "Failed to send frame");
                self.metrics.record_dropped(DropReason::SendFailed);
                false
            }
        }
    }
}
