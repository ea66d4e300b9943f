//! Climate module payloads

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemperatureUnit {
    Fahrenheit,
    Celsius,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Temperature {
    pub unit: TemperatureUnit,
    pub value: f64,
}

impl Temperature {
    pub fn celsius(value: f64) -> Self {
        Self {
            unit: TemperatureUnit::Celsius,
            value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DefrostZone {
    Front,
    Rear,
    All,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VentilationMode {
    Upper,
    Lower,
    Both,
    None,
}

/// Climate control state. Every field is optional so the same type serves
/// partial writes and full reads.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClimateControlData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fan_speed: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_temperature: Option<Temperature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_temperature: Option<Temperature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ac_enable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circulate_air_enable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_mode_enable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defrost_zone: Option<DefrostZone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dual_mode_enable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ac_max_enable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ventilation_mode: Option<VentilationMode>,
    /// Fields this endpoint does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ClimateControlData {
    /// Overlay every field present in `update` onto `self`.
    pub fn apply(&mut self, update: &ClimateControlData) {
        macro_rules! overlay {
            ($($field:ident),*) => {
                $(if update.$field.is_some() {
                    self.$field = update.$field;
                })*
            };
        }
        overlay!(
            fan_speed,
            current_temperature,
            desired_temperature,
            ac_enable,
            circulate_air_enable,
            auto_mode_enable,
            defrost_zone,
            dual_mode_enable,
            ac_max_enable,
            ventilation_mode
        );
        for (key, value) in &update.extra {
            self.extra.insert(key.clone(), value.clone());
        }
    }
}

/// What a climate module supports.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClimateControlCapabilities {
    pub module_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fan_speed_available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_temperature_available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ac_enable_available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ac_max_enable_available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circulate_air_enable_available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_mode_enable_available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dual_mode_enable_available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defrost_zone_available: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub defrost_zone: Vec<DefrostZone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ventilation_mode_available: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ventilation_mode: Vec<VentilationMode>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
