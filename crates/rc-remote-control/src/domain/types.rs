//! Core Remote Control domain types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::climate::ClimateControlData;
use super::radio::RadioControlData;

/// Application identifier assigned by SDL core.
pub type AppId = u64;

/// A remotely controllable vehicle subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModuleType {
    Climate,
    Radio,
}

impl ModuleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleType::Climate => "CLIMATE",
            ModuleType::Radio => "RADIO",
        }
    }
}

impl fmt::Display for ModuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `moduleType` as named by the peer.
///
/// Names outside [`ModuleType`] are kept so they can be echoed back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModuleKind {
    Known(ModuleType),
    Unknown(String),
}

impl ModuleKind {
    pub fn known(&self) -> Option<ModuleType> {
        match self {
            ModuleKind::Known(module_type) => Some(*module_type),
            ModuleKind::Unknown(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ModuleKind::Known(module_type) => module_type.as_str(),
            ModuleKind::Unknown(name) => name,
        }
    }
}

impl From<ModuleType> for ModuleKind {
    fn from(value: ModuleType) -> Self {
        ModuleKind::Known(value)
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Module payload carried by set/get replies and data notifications.
///
/// Only the fields that are present are serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_type: Option<ModuleKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub climate_control_data: Option<ClimateControlData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radio_control_data: Option<RadioControlData>,
}

impl ModuleData {
    pub fn new(module_type: ModuleType) -> Self {
        Self::echo(Some(module_type.into()))
    }

    /// No payload, with `moduleType` exactly as requested.
    pub fn echo(module_type: Option<ModuleKind>) -> Self {
        Self {
            module_type,
            climate_control_data: None,
            radio_control_data: None,
        }
    }

    /// The requested module, when it is one this component serves.
    pub fn known_type(&self) -> Option<ModuleType> {
        self.module_type.as_ref().and_then(ModuleKind::known)
    }

    pub fn with_climate(mut self, data: ClimateControlData) -> Self {
        self.climate_control_data = Some(data);
        self
    }

    pub fn with_radio(mut self, data: RadioControlData) -> Self {
        self.radio_control_data = Some(data);
        self
    }
}

/// Identity of a connected mobile device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Transport details and other fields passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DeviceInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            extra: Map::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Role of a device inside the vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceRank {
    Driver,
    Passenger,
}

/// How passenger requests for module access are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessMode {
    #[default]
    AutoAllow,
    AutoDeny,
    AskDriver,
}

impl std::str::FromStr for AccessMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AUTO_ALLOW" => Ok(AccessMode::AutoAllow),
            "AUTO_DENY" => Ok(AccessMode::AutoDeny),
            "ASK_DRIVER" => Ok(AccessMode::AskDriver),
            other => Err(format!("unknown access mode: {}", other)),
        }
    }
}

/// An application registered with SDL core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationInfo {
    pub app_id: AppId,
    pub app_name: String,
    /// Name of the device the application runs on.
    pub device_name: String,
}

/// Global remote-control consent state.
///
/// Owned by the settings subsystem; the endpoint only reads it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConsentState {
    /// The single device currently allowed to control modules.
    pub driver_device: Option<DeviceInfo>,
    pub reverse_functionality_enabled: bool,
    pub reverse_access_mode: AccessMode,
}
