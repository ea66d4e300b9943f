//! Result payloads of successful RC replies
//!
//! Every result carries `code` (always `SUCCESS` here) and the `method` it
//! answers.

use hmi_types::ResultCode;
use serde::Serialize;

use crate::domain::{ModuleData, RemoteControlCapability};

/// `RC.IsReady` result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IsReadyResult {
    pub available: bool,
    pub code: ResultCode,
    pub method: String,
}

impl IsReadyResult {
    pub fn new(method: &str, available: bool) -> Self {
        Self {
            available,
            code: ResultCode::Success,
            method: method.to_string(),
        }
    }
}

/// `RC.GetCapabilities` result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCapabilitiesResult {
    pub code: ResultCode,
    pub method: String,
    pub remote_control_capability: RemoteControlCapability,
}

impl GetCapabilitiesResult {
    pub fn new(method: &str, remote_control_capability: RemoteControlCapability) -> Self {
        Self {
            code: ResultCode::Success,
            method: method.to_string(),
            remote_control_capability,
        }
    }
}

/// `RC.SetInteriorVehicleData` result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetInteriorVehicleDataResult {
    pub code: ResultCode,
    pub method: String,
    pub module_data: ModuleData,
}

impl SetInteriorVehicleDataResult {
    pub fn new(method: &str, module_data: ModuleData) -> Self {
        Self {
            code: ResultCode::Success,
            method: method.to_string(),
            module_data,
        }
    }
}

/// `RC.GetInteriorVehicleData` result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetInteriorVehicleDataResult {
    pub code: ResultCode,
    pub method: String,
    pub module_data: ModuleData,
    /// Echo of the request's `subscribe`, when it was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_subscribed: Option<bool>,
}

impl GetInteriorVehicleDataResult {
    pub fn new(method: &str, module_data: ModuleData, is_subscribed: Option<bool>) -> Self {
        Self {
            code: ResultCode::Success,
            method: method.to_string(),
            module_data,
            is_subscribed,
        }
    }
}

/// Deferred reply to `RC.GetInteriorVehicleDataConsent`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsentResult {
    pub code: ResultCode,
    pub method: String,
    pub allowed: bool,
}

impl ConsentResult {
    pub fn new(method: &str, allowed: bool) -> Self {
        Self {
            code: ResultCode::Success,
            method: method.to_string(),
            allowed,
        }
    }
}
