//! JSON-RPC 2.0 envelopes exchanged over the HMI bus.
//!
//! Every outbound frame carries `"jsonrpc": "2.0"`. Inbound frames are
//! classified by shape: `method` + `id` is a request, `method` alone is a
//! notification, `result` is a response and `error` is an error reply.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

use crate::errors::TypesError;
use crate::result_code::ResultCode;

/// Protocol version string carried by every frame.
pub const JSONRPC_VERSION: &str = "2.0";

fn default_version() -> String {
    JSONRPC_VERSION.to_string()
}

/// Request correlation token.
///
/// Opaque to the endpoint: it is copied unchanged from request to reply.
/// Ids that are neither an `i64` nor a string (fractions, integers past
/// `i64::MAX`, `null`) are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RpcId {
    Number(i64),
    String(String),
    Other(Value),
}

impl fmt::Display for RpcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcId::Number(n) => write!(f, "{}", n),
            RpcId::String(s) => write!(f, "\"{}\"", s),
            RpcId::Other(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for RpcId {
    fn from(value: i64) -> Self {
        RpcId::Number(value)
    }
}

impl From<&str> for RpcId {
    fn from(value: &str) -> Self {
        RpcId::String(value.to_string())
    }
}

/// Inbound method call that expects a reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    #[serde(default = "default_version")]
    pub jsonrpc: String,
    pub id: RpcId,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl RpcRequest {
    pub fn new(id: impl Into<RpcId>, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: default_version(),
            id: id.into(),
            method: method.into(),
            params,
        }
    }

    /// Params as a JSON object, if they are one.
    pub fn params_object(&self) -> Option<&Map<String, Value>> {
        self.params.as_ref().and_then(Value::as_object)
    }
}

/// Successful reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    #[serde(default = "default_version")]
    pub jsonrpc: String,
    pub id: RpcId,
    pub result: Value,
}

impl RpcResponse {
    pub fn new(id: RpcId, result: Value) -> Self {
        Self {
            jsonrpc: default_version(),
            id,
            result,
        }
    }

    /// `result.method`, when the peer included it.
    pub fn method(&self) -> Option<&str> {
        self.result.get("method").and_then(Value::as_str)
    }

    /// `result.code`, when present and known.
    pub fn code(&self) -> Option<ResultCode> {
        self.result
            .get("code")
            .and_then(Value::as_i64)
            .and_then(|c| ResultCode::try_from(c).ok())
    }
}

/// Body of an error reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcErrorObject {
    pub code: ResultCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Failed reply. Never carries `SUCCESS`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcErrorReply {
    #[serde(default = "default_version")]
    pub jsonrpc: String,
    pub id: RpcId,
    pub error: RpcErrorObject,
}

impl RpcErrorReply {
    /// Builds `{id, error: {code, message?, data: {method}}}`.
    pub fn new(id: RpcId, code: ResultCode, method: &str, message: Option<String>) -> Self {
        Self {
            jsonrpc: default_version(),
            id,
            error: RpcErrorObject {
                code,
                message,
                data: Some(json!({ "method": method })),
            },
        }
    }

    /// `error.data.method`, when present.
    pub fn method(&self) -> Option<&str> {
        self.error
            .data
            .as_ref()
            .and_then(|d| d.get("method"))
            .and_then(Value::as_str)
    }
}

/// Fire-and-forget event. Never carries an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcNotification {
    #[serde(default = "default_version")]
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

impl RpcNotification {
    pub fn new(method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: default_version(),
            method: method.into(),
            params,
        }
    }
}

/// A decoded frame delivered to a bus component.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundFrame {
    Request(RpcRequest),
    Notification(RpcNotification),
    Response(RpcResponse),
    Error(RpcErrorReply),
}

impl InboundFrame {
    /// Classify and decode a raw JSON value.
    pub fn from_value(value: Value) -> Result<Self, TypesError> {
        let object = value.as_object().ok_or(TypesError::NotAnObject)?;

        let kind = if object.contains_key("method") {
            if object.contains_key("id") {
                "request"
            } else {
                "notification"
            }
        } else if object.contains_key("error") {
            "error"
        } else if object.contains_key("result") {
            "response"
        } else {
            let keys: Vec<&str> = object.keys().map(String::as_str).collect();
            return Err(TypesError::UnrecognizedFrame(keys.join(",")));
        };

        let malformed = |e: serde_json::Error| TypesError::Malformed {
            kind,
            reason: e.to_string(),
        };

        match kind {
            "request" => serde_json::from_value(value)
                .map(InboundFrame::Request)
                .map_err(malformed),
            "notification" => serde_json::from_value(value)
                .map(InboundFrame::Notification)
                .map_err(malformed),
            "error" => serde_json::from_value(value)
                .map(InboundFrame::Error)
                .map_err(malformed),
            _ => serde_json::from_value(value)
                .map(InboundFrame::Response)
                .map_err(malformed),
        }
    }

    /// Parse one JSON text frame.
    pub fn parse(text: &str) -> Result<Self, TypesError> {
        let value: Value = serde_json::from_str(text).map_err(|e| TypesError::Malformed {
            kind: "json",
            reason: e.to_string(),
        })?;
        Self::from_value(value)
    }

    /// Method name carried by the frame, if any.
    pub fn method(&self) -> Option<&str> {
        match self {
            InboundFrame::Request(r) => Some(&r.method),
            InboundFrame::Notification(n) => Some(&n.method),
            InboundFrame::Response(r) => r.method(),
            InboundFrame::Error(e) => e.method(),
        }
    }
}

/// A frame emitted by a bus component.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutboundFrame {
    Response(RpcResponse),
    Error(RpcErrorReply),
    Notification(RpcNotification),
}

impl OutboundFrame {
    /// Correlation id, absent for notifications.
    pub fn id(&self) -> Option<&RpcId> {
        match self {
            OutboundFrame::Response(r) => Some(&r.id),
            OutboundFrame::Error(e) => Some(&e.id),
            OutboundFrame::Notification(_) => None,
        }
    }

    pub fn method(&self) -> Option<&str> {
        match self {
            OutboundFrame::Response(r) => r.method(),
            OutboundFrame::Error(e) => e.method(),
            OutboundFrame::Notification(n) => Some(&n.method),
        }
    }

    pub fn is_notification(&self) -> bool {
        matches!(self, OutboundFrame::Notification(_))
    }

    pub fn to_value(&self) -> Value {
        match self {
            OutboundFrame::Response(r) => json!({
                "jsonrpc": r.jsonrpc,
                "id": r.id,
                "result": r.result,
            }),
            OutboundFrame::Error(e) => {
                let mut error = Map::new();
                error.insert("code".into(), json!(e.error.code));
                if let Some(message) = &e.error.message {
                    error.insert("message".into(), json!(message));
                }
                if let Some(data) = &e.error.data {
                    error.insert("data".into(), data.clone());
                }
                json!({
                    "jsonrpc": e.jsonrpc,
                    "id": e.id,
                    "error": error,
                })
            }
            OutboundFrame::Notification(n) => json!({
                "jsonrpc": n.jsonrpc,
                "method": n.method,
                "params": n.params,
            }),
        }
    }
}

impl From<RpcResponse> for OutboundFrame {
    fn from(value: RpcResponse) -> Self {
        OutboundFrame::Response(value)
    }
}

impl From<RpcErrorReply> for OutboundFrame {
    fn from(value: RpcErrorReply) -> Self {
        OutboundFrame::Error(value)
    }
}

impl From<RpcNotification> for OutboundFrame {
    fn from(value: RpcNotification) -> Self {
        OutboundFrame::Notification(value)
    }
}

impl fmt::Display for OutboundFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}
