//! Inbound RC requests

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domain::{AppId, ModuleData, ModuleKind};
use crate::error::RcError;

/// The request methods served by the RC component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RcMethod {
    IsReady,
    GetCapabilities,
    SetInteriorVehicleData,
    GetInteriorVehicleData,
    GetInteriorVehicleDataConsent,
}

impl RcMethod {
    pub const ALL: [RcMethod; 5] = [
        RcMethod::IsReady,
        RcMethod::GetCapabilities,
        RcMethod::SetInteriorVehicleData,
        RcMethod::GetInteriorVehicleData,
        RcMethod::GetInteriorVehicleDataConsent,
    ];

    /// Method name without the component prefix.
    pub fn short_name(&self) -> &'static str {
        match self {
            RcMethod::IsReady => "IsReady",
            RcMethod::GetCapabilities => "GetCapabilities",
            RcMethod::SetInteriorVehicleData => "SetInteriorVehicleData",
            RcMethod::GetInteriorVehicleData => "GetInteriorVehicleData",
            RcMethod::GetInteriorVehicleDataConsent => "GetInteriorVehicleDataConsent",
        }
    }

    pub fn from_short_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| m.short_name() == name)
    }

    /// Whether the request must carry a `params` object.
    pub fn requires_params(&self) -> bool {
        matches!(
            self,
            RcMethod::SetInteriorVehicleData
                | RcMethod::GetInteriorVehicleData
                | RcMethod::GetInteriorVehicleDataConsent
        )
    }
}

/// `RC.SetInteriorVehicleData` params.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetInteriorVehicleDataParams {
    pub module_data: ModuleData,
    #[serde(default, rename = "appID")]
    pub app_id: Option<AppId>,
}

/// `RC.GetInteriorVehicleData` params.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetInteriorVehicleDataParams {
    #[serde(rename = "appID")]
    pub app_id: AppId,
    /// Absent or unrecognized types are answered with no payload.
    #[serde(default)]
    pub module_type: Option<ModuleKind>,
    #[serde(default)]
    pub subscribe: Option<bool>,
}

/// Decode a params object into a typed request.
pub fn decode_params<T: DeserializeOwned>(params: &Map<String, Value>) -> Result<T, RcError> {
    serde_json::from_value(Value::Object(params.clone())).map_err(RcError::invalid_params)
}
