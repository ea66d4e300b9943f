//! Outbound RC notifications
//!
//! Each params type knows its method name. Builders apply the field
//! inclusion rules; serialization never adds an `id`.

use serde::Serialize;

use crate::domain::{
    AccessMode, ClimateControlData, DeviceInfo, DeviceRank, ModuleData, ModuleType,
    RadioControlData,
};

/// Params of a notification emitted by the RC component.
pub trait RcNotificationParams: Serialize {
    /// Method name without the component prefix.
    const METHOD: &'static str;
}

/// `RC.OnRemoteControlSettings`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteControlSettingsParams {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_mode: Option<AccessMode>,
}

impl RemoteControlSettingsParams {
    /// `accessMode` is included only when remote control is allowed.
    pub fn new(allowed: bool, access_mode: AccessMode) -> Self {
        Self {
            allowed,
            access_mode: allowed.then_some(access_mode),
        }
    }
}

impl RcNotificationParams for RemoteControlSettingsParams {
    const METHOD: &'static str = "OnRemoteControlSettings";
}

/// `RC.OnDeviceRankChanged`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRankChangedParams {
    pub device: DeviceInfo,
    pub device_rank: DeviceRank,
}

impl DeviceRankChangedParams {
    /// `None` when there is no device to report.
    pub fn new(device: Option<&DeviceInfo>, rank: DeviceRank) -> Option<Self> {
        let device = device.filter(|d| !d.name.is_empty())?;
        Some(Self {
            device: device.clone(),
            device_rank: rank,
        })
    }
}

impl RcNotificationParams for DeviceRankChangedParams {
    const METHOD: &'static str = "OnDeviceRankChanged";
}

/// `RC.OnInteriorVehicleData`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteriorVehicleDataParams {
    pub module_data: ModuleData,
}

impl InteriorVehicleDataParams {
    pub fn new(
        module_type: ModuleType,
        climate: Option<ClimateControlData>,
        radio: Option<RadioControlData>,
    ) -> Self {
        Self {
            module_data: ModuleData {
                module_type: Some(module_type.into()),
                climate_control_data: climate,
                radio_control_data: radio,
            },
        }
    }
}

impl RcNotificationParams for InteriorVehicleDataParams {
    const METHOD: &'static str = "OnInteriorVehicleData";
}
