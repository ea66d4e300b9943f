//! Capability aggregation
//!
//! Merges the climate and radio capability descriptors into the single
//! `remoteControlCapability` structure returned by `GetCapabilities`.
//! Button entries are ordered climate first, then radio.

use serde::{Deserialize, Serialize};

use super::climate::ClimateControlCapabilities;
use super::radio::RadioControlCapabilities;
use crate::ports::{ClimateModel, RadioModel};

/// A physical or virtual control button and the presses it supports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonCapabilities {
    /// Button name, e.g. `AC`, `FAN_UP`, `VOLUME_UP`.
    pub name: String,
    pub short_press_available: bool,
    pub long_press_available: bool,
    pub up_down_available: bool,
}

impl ButtonCapabilities {
    /// A button supporting short and long presses but no up/down.
    pub fn pressable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short_press_available: true,
            long_press_available: true,
            up_down_available: false,
        }
    }
}

/// Everything the vehicle can be remotely asked to do.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteControlCapability {
    pub climate_control_capabilities: Vec<ClimateControlCapabilities>,
    pub radio_control_capabilities: Vec<RadioControlCapabilities>,
    pub button_capabilities: Vec<ButtonCapabilities>,
}

/// Combine per-module descriptors. Climate buttons precede radio buttons.
pub fn merge_capabilities(
    climate: Vec<ClimateControlCapabilities>,
    climate_buttons: Vec<ButtonCapabilities>,
    radio: Vec<RadioControlCapabilities>,
    radio_buttons: Vec<ButtonCapabilities>,
) -> RemoteControlCapability {
    let mut button_capabilities = climate_buttons;
    button_capabilities.extend(radio_buttons);

    RemoteControlCapability {
        climate_control_capabilities: climate,
        radio_control_capabilities: radio,
        button_capabilities,
    }
}

/// Query both models and merge. Never cached.
pub fn aggregate_capabilities(
    climate: &dyn ClimateModel,
    radio: &dyn RadioModel,
) -> RemoteControlCapability {
    merge_capabilities(
        climate.climate_control_capabilities(),
        climate.climate_button_capabilities(),
        radio.radio_control_capabilities(),
        radio.radio_button_capabilities(),
    )
}
