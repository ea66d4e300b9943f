//! Consent arbitration
//!
//! Only one device, the recorded driver device, may read or write module
//! data, and only while reverse functionality is enabled. A failed check is
//! answered with `REJECTED` and no subsystem is touched.

use serde_json::{Map, Value};
use tracing::debug;

use super::types::{AppId, ConsentState};
use crate::ports::{ApplicationRegistry, RemoteControlSettings};

/// Module type named by a request, looked up in priority order:
/// `moduleDescription.moduleType`, `moduleData.moduleType`, `moduleType`.
///
/// The first container present decides, even if it lacks `moduleType`.
pub fn requested_module_type(params: &Map<String, Value>) -> Option<&str> {
    let source = if let Some(description) = present(params, "moduleDescription") {
        description.get("moduleType")
    } else if let Some(data) = present(params, "moduleData") {
        data.get("moduleType")
    } else {
        params.get("moduleType")
    };
    source.and_then(Value::as_str)
}

fn present<'a>(params: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    params.get(key).filter(|v| !v.is_null())
}

/// `appID` as an application id, if present and numeric.
pub fn requested_app_id(params: &Map<String, Value>) -> Option<AppId> {
    params.get("appID").and_then(Value::as_u64)
}

/// Pure consent rule.
///
/// `device_name` is the resolved owner of the requesting application, or
/// `None` when the application is unknown; an unknown application never
/// matches a recorded driver device.
pub fn is_consented(state: &ConsentState, device_name: Option<&str>) -> bool {
    if !state.reverse_functionality_enabled {
        return false;
    }
    match &state.driver_device {
        Some(driver) => device_name == Some(driver.name.as_str()),
        None => true,
    }
}

/// Decide whether the application behind `params` may access module data.
pub fn consented_app_check(
    params: &Map<String, Value>,
    registry: &dyn ApplicationRegistry,
    settings: &dyn RemoteControlSettings,
) -> bool {
    let module_type = requested_module_type(params);
    let app_id = requested_app_id(params);
    let device_name = app_id.and_then(|id| registry.device_name(id));
    let state = settings.consent_state();

    let allowed = is_consented(&state, device_name.as_deref());
    debug!(
        module_type = module_type.unwrap_or("<none>"),
        app_id = ?app_id,
        device = device_name.as_deref().unwrap_or("<unknown>"),
        driver = state
            .driver_device
            .as_ref()
            .map(|d| d.name.as_str())
            .unwrap_or("<none>"),
        enabled = state.reverse_functionality_enabled,
        allowed,
        "Consent check"
    );
    allowed
}
