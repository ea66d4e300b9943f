//! Domain layer: module payloads, consent rule and capability aggregation.

pub mod capabilities;
pub mod climate;
pub mod consent;
pub mod radio;
pub mod types;

pub use capabilities::{
    aggregate_capabilities, merge_capabilities, ButtonCapabilities, RemoteControlCapability,
};
pub use climate::{
    ClimateControlCapabilities, ClimateControlData, DefrostZone, Temperature, TemperatureUnit,
    VentilationMode,
};
pub use consent::{consented_app_check, is_consented, requested_app_id, requested_module_type};
pub use radio::{FrequencyBounds, RadioBand, RadioControlCapabilities, RadioControlData, RadioState};
pub use types::{
    AccessMode, AppId, ApplicationInfo, ConsentState, DeviceInfo, DeviceRank, ModuleData,
    ModuleKind, ModuleType,
};
