//! In-memory reference subsystems
//!
//! Climate and radio models, an application registry, a settings store and
//! consent resolvers that keep everything in process. Used by the runtime
//! binary and by tests.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::domain::{
    AccessMode, AppId, ApplicationInfo, ButtonCapabilities, ClimateControlCapabilities,
    ClimateControlData, ConsentState, DefrostZone, DeviceInfo, FrequencyBounds, RadioBand,
    RadioControlCapabilities, RadioControlData, RadioState, Temperature, VentilationMode,
};
use crate::error::ModelError;
use crate::events::PendingConsent;
use crate::ports::{
    ApplicationRegistry, ClimateModel, ConsentResolver, RadioModel, RemoteControlSettings,
};

/// Highest accepted fan speed, in percent.
pub const MAX_FAN_SPEED: u8 = 100;

const CLIMATE_BUTTONS: [&str; 12] = [
    "AC_MAX",
    "AC",
    "RECIRCULATE",
    "FAN_UP",
    "FAN_DOWN",
    "TEMP_UP",
    "TEMP_DOWN",
    "DEFROST_MAX",
    "DEFROST",
    "DEFROST_REAR",
    "UPPER_VENT",
    "LOWER_VENT",
];

const RADIO_BUTTONS: [&str; 6] = [
    "VOLUME_UP",
    "VOLUME_DOWN",
    "EJECT",
    "SOURCE",
    "SHUFFLE",
    "REPEAT",
];

/// Climate module kept in memory.
pub struct ReferenceClimateModel {
    state: Mutex<ClimateControlData>,
    capabilities: Vec<ClimateControlCapabilities>,
    buttons: Vec<ButtonCapabilities>,
}

impl ReferenceClimateModel {
    pub fn new() -> Self {
        Self::with_state(ClimateControlData {
            fan_speed: Some(0),
            current_temperature: Some(Temperature::celsius(20.0)),
            desired_temperature: Some(Temperature::celsius(22.0)),
            ac_enable: Some(false),
            circulate_air_enable: Some(false),
            auto_mode_enable: Some(false),
            defrost_zone: Some(DefrostZone::None),
            dual_mode_enable: Some(false),
            ac_max_enable: Some(false),
            ventilation_mode: Some(VentilationMode::Both),
            ..Default::default()
        })
    }

    pub fn with_state(state: ClimateControlData) -> Self {
        let capabilities = ClimateControlCapabilities {
            module_name: "primary_climate".to_string(),
            fan_speed_available: Some(true),
            desired_temperature_available: Some(true),
            ac_enable_available: Some(true),
            ac_max_enable_available: Some(true),
            circulate_air_enable_available: Some(true),
            auto_mode_enable_available: Some(true),
            dual_mode_enable_available: Some(true),
            defrost_zone_available: Some(true),
            defrost_zone: vec![
                DefrostZone::Front,
                DefrostZone::Rear,
                DefrostZone::All,
                DefrostZone::None,
            ],
            ventilation_mode_available: Some(true),
            ventilation_mode: vec![
                VentilationMode::Upper,
                VentilationMode::Lower,
                VentilationMode::Both,
                VentilationMode::None,
            ],
            ..Default::default()
        };
        Self {
            state: Mutex::new(state),
            capabilities: vec![capabilities],
            buttons: CLIMATE_BUTTONS
                .iter()
                .map(|name| ButtonCapabilities::pressable(*name))
                .collect(),
        }
    }
}

impl Default for ReferenceClimateModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ClimateModel for ReferenceClimateModel {
    fn climate_control_capabilities(&self) -> Vec<ClimateControlCapabilities> {
        self.capabilities.clone()
    }

    fn climate_button_capabilities(&self) -> Vec<ButtonCapabilities> {
        self.buttons.clone()
    }

    fn climate_control_data(&self) -> ClimateControlData {
        self.state.lock().clone()
    }

    fn set_climate_data(
        &self,
        data: &ClimateControlData,
    ) -> Result<ClimateControlData, ModelError> {
        if let Some(speed) = data.fan_speed {
            if speed > MAX_FAN_SPEED {
                return Err(ModelError::InvalidData(format!(
                    "fanSpeed must be within 0-{}, got {}",
                    MAX_FAN_SPEED, speed
                )));
            }
        }
        self.state.lock().apply(data);
        debug!(?data, "Climate data applied");
        Ok(data.clone())
    }
}

/// Radio module kept in memory.
///
/// Switching band without a frequency retunes to the bottom of the new band.
pub struct ReferenceRadioModel {
    state: Mutex<RadioControlData>,
    saved: Mutex<Option<RadioControlData>>,
    capabilities: Vec<RadioControlCapabilities>,
    buttons: Vec<ButtonCapabilities>,
}

impl ReferenceRadioModel {
    /// Radio switched off, tuned to FM 87.9.
    pub fn new() -> Self {
        Self::with_state(RadioControlData {
            frequency_integer: Some(87),
            frequency_fraction: Some(9),
            band: Some(RadioBand::Fm),
            available_h_ds: Some(0),
            hd_channel: Some(0),
            signal_strength: Some(50),
            signal_change_threshold: Some(10),
            radio_enable: Some(false),
            state: Some(RadioState::Acquired),
            ..Default::default()
        })
    }

    pub fn with_state(state: RadioControlData) -> Self {
        let capabilities = RadioControlCapabilities {
            module_name: "radio".to_string(),
            radio_enable_available: Some(true),
            radio_band_available: Some(true),
            radio_frequency_available: Some(true),
            hd_channel_available: Some(true),
            rds_data_available: Some(true),
            available_h_ds_available: Some(true),
            state_available: Some(true),
            signal_strength_available: Some(true),
            signal_change_threshold_available: Some(true),
            ..Default::default()
        };
        Self {
            state: Mutex::new(state),
            saved: Mutex::new(None),
            capabilities: vec![capabilities],
            buttons: RADIO_BUTTONS
                .iter()
                .map(|name| ButtonCapabilities::pressable(*name))
                .collect(),
        }
    }

    /// Snapshot taken by the last `save_current_options`.
    pub fn saved_options(&self) -> Option<RadioControlData> {
        self.saved.lock().clone()
    }
}

impl Default for ReferenceRadioModel {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a band's lower bound into integer and fraction parts.
fn band_floor(band: RadioBand) -> (u16, u8) {
    let tenths = (FrequencyBounds::for_band(band).min * 10.0).round() as u32;
    ((tenths / 10) as u16, (tenths % 10) as u8)
}

impl RadioModel for ReferenceRadioModel {
    fn radio_control_capabilities(&self) -> Vec<RadioControlCapabilities> {
        self.capabilities.clone()
    }

    fn radio_button_capabilities(&self) -> Vec<ButtonCapabilities> {
        self.buttons.clone()
    }

    fn radio_control_data(&self) -> RadioControlData {
        self.state.lock().clone()
    }

    fn set_radio_data(&self, data: &RadioControlData) -> Result<RadioControlData, ModelError> {
        let mut state = self.state.lock();
        let mut written = data.clone();

        let band_changed = data.band.is_some() && data.band != state.band;
        if band_changed && data.frequency_integer.is_none() {
            if let Some(band) = data.band {
                let (integer, fraction) = band_floor(band);
                written.frequency_integer = Some(integer);
                written.frequency_fraction = Some(fraction);
            }
        }
        // An integer written alone means a whole frequency.
        if written.frequency_integer.is_some() && written.frequency_fraction.is_none() {
            written.frequency_fraction = Some(0);
        }
        state.apply(&written);
        debug!(?written, "Radio data applied");
        Ok(written)
    }

    fn check_frequency_boundaries(&self, data: &RadioControlData) -> Result<(), ModelError> {
        if data.frequency_integer.is_none() && data.frequency_fraction.is_none() {
            return Ok(());
        }
        let state = self.state.lock();
        let band = data.band.or(state.band).unwrap_or(RadioBand::Fm);

        let (integer, fraction) = match data.frequency_integer {
            Some(integer) => (integer, data.frequency_fraction.unwrap_or(0)),
            None => (
                state.frequency_integer.unwrap_or(0),
                data.frequency_fraction.unwrap_or(0),
            ),
        };
        FrequencyBounds::for_band(band).check(integer, fraction)
    }

    fn is_radio_enabled(&self) -> bool {
        self.state.lock().radio_enable.unwrap_or(false)
    }

    fn save_current_options(&self) {
        let snapshot = self.state.lock().clone();
        info!(
            band = ?snapshot.band,
            frequency = ?snapshot.frequency(),
            "Radio options saved"
        );
        *self.saved.lock() = Some(snapshot);
    }
}

/// Application registry kept in memory.
#[derive(Default)]
pub struct InMemoryApplicationRegistry {
    apps: Mutex<HashMap<AppId, ApplicationInfo>>,
}

impl InMemoryApplicationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &self,
        app_id: AppId,
        app_name: impl Into<String>,
        device_name: impl Into<String>,
    ) {
        let app = ApplicationInfo {
            app_id,
            app_name: app_name.into(),
            device_name: device_name.into(),
        };
        self.apps.lock().insert(app_id, app);
    }

    pub fn unregister(&self, app_id: AppId) -> Option<ApplicationInfo> {
        self.apps.lock().remove(&app_id)
    }

    pub fn len(&self) -> usize {
        self.apps.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.lock().is_empty()
    }
}

impl ApplicationRegistry for InMemoryApplicationRegistry {
    fn application(&self, app_id: AppId) -> Option<ApplicationInfo> {
        self.apps.lock().get(&app_id).cloned()
    }
}

/// Remote-control settings kept in memory.
#[derive(Default)]
pub struct InMemorySettings {
    state: Mutex<ConsentState>,
}

impl InMemorySettings {
    /// No driver device, reverse functionality off, `AUTO_ALLOW`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: ConsentState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn set_driver_device(&self, device: Option<DeviceInfo>) {
        self.state.lock().driver_device = device;
    }

    pub fn set_reverse_functionality_enabled(&self, enabled: bool) {
        self.state.lock().reverse_functionality_enabled = enabled;
    }

    pub fn set_reverse_access_mode(&self, mode: AccessMode) {
        self.state.lock().reverse_access_mode = mode;
    }
}

impl RemoteControlSettings for InMemorySettings {
    fn driver_device(&self) -> Option<DeviceInfo> {
        self.state.lock().driver_device.clone()
    }

    fn reverse_functionality_enabled(&self) -> bool {
        self.state.lock().reverse_functionality_enabled
    }

    fn reverse_access_mode(&self) -> AccessMode {
        self.state.lock().reverse_access_mode
    }

    fn consent_state(&self) -> ConsentState {
        self.state.lock().clone()
    }
}

/// Holds consent requests until someone resolves them.
#[derive(Default)]
pub struct QueuedConsentResolver {
    pending: Mutex<Vec<PendingConsent>>,
}

impl QueuedConsentResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return every waiting request, oldest first.
    pub fn take_pending(&self) -> Vec<PendingConsent> {
        std::mem::take(&mut *self.pending.lock())
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }
}

impl ConsentResolver for QueuedConsentResolver {
    fn request_consent(&self, pending: PendingConsent) {
        debug!(id = %pending.request().id, "Consent request queued");
        self.pending.lock().push(pending);
    }
}

/// Resolves consent from the configured access mode.
///
/// `AUTO_ALLOW` and `AUTO_DENY` answer at once; `ASK_DRIVER` queues the
/// request for a human decision.
pub struct AccessModeConsentResolver {
    settings: Arc<dyn RemoteControlSettings>,
    queue: QueuedConsentResolver,
}

impl AccessModeConsentResolver {
    pub fn new(settings: Arc<dyn RemoteControlSettings>) -> Self {
        Self {
            settings,
            queue: QueuedConsentResolver::new(),
        }
    }

    /// Requests waiting for the driver.
    pub fn queue(&self) -> &QueuedConsentResolver {
        &self.queue
    }
}

impl ConsentResolver for AccessModeConsentResolver {
    fn request_consent(&self, pending: PendingConsent) {
        match self.settings.reverse_access_mode() {
            AccessMode::AutoAllow => {
                pending.resolve(true);
            }
            AccessMode::AutoDeny => {
                pending.resolve(false);
            }
            AccessMode::AskDriver => self.queue.request_consent(pending),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{RcCommand, RcHandle};
    use hmi_types::RpcRequest;
    use serde_json::json;

    #[test]
    fn test_climate_rejects_excessive_fan_speed() {
        let model = ReferenceClimateModel::new();
        let err = model
            .set_climate_data(&ClimateControlData {
                fan_speed: Some(150),
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::InvalidData("fanSpeed must be within 0-100, got 150".into())
        );
        assert_eq!(model.climate_control_data().fan_speed, Some(0));
    }

    #[test]
    fn test_climate_write_returns_written_fields() {
        let model = ReferenceClimateModel::new();
        let written = model
            .set_climate_data(&ClimateControlData {
                ac_enable: Some(true),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(written.ac_enable, Some(true));
        assert_eq!(written.fan_speed, None);
        assert_eq!(model.climate_control_data().ac_enable, Some(true));
    }

    #[test]
    fn test_frequency_checked_against_current_band() {
        let model = ReferenceRadioModel::new();
        let fm = RadioControlData {
            frequency_integer: Some(101),
            frequency_fraction: Some(1),
            ..Default::default()
        };
        assert!(model.check_frequency_boundaries(&fm).is_ok());

        let too_low = RadioControlData {
            frequency_integer: Some(80),
            ..Default::default()
        };
        let err = model.check_frequency_boundaries(&too_low).unwrap_err();
        assert_eq!(
            err,
            ModelError::InvalidData("Frequency 80 is out of FM range 87.5-108".into())
        );

        let am = RadioControlData {
            band: Some(RadioBand::Am),
            frequency_integer: Some(1000),
            ..Default::default()
        };
        assert!(model.check_frequency_boundaries(&am).is_ok());
    }

    #[test]
    fn test_band_switch_retunes_to_band_floor() {
        let model = ReferenceRadioModel::new();
        let written = model
            .set_radio_data(&RadioControlData {
                band: Some(RadioBand::Am),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(written.frequency_integer, Some(535));
        assert_eq!(written.frequency_fraction, Some(0));
        assert_eq!(model.radio_control_data().band, Some(RadioBand::Am));
    }

    #[test]
    fn test_integer_without_fraction_clears_old_fraction() {
        let model = ReferenceRadioModel::new();
        let update = RadioControlData {
            band: Some(RadioBand::Am),
            frequency_integer: Some(1000),
            ..Default::default()
        };
        assert!(model.check_frequency_boundaries(&update).is_ok());

        let written = model.set_radio_data(&update).unwrap();
        assert_eq!(written.frequency_fraction, Some(0));

        let state = model.radio_control_data();
        assert_eq!(state.band, Some(RadioBand::Am));
        assert_eq!(state.frequency_integer, Some(1000));
        assert_eq!(state.frequency_fraction, Some(0));
        assert!(model.check_frequency_boundaries(&state).is_ok());
    }

    #[test]
    fn test_save_current_options_snapshots_state() {
        let model = ReferenceRadioModel::new();
        assert!(model.saved_options().is_none());
        model
            .set_radio_data(&RadioControlData {
                radio_enable: Some(true),
                ..Default::default()
            })
            .unwrap();
        model.save_current_options();

        let saved = model.saved_options().unwrap();
        assert_eq!(saved.radio_enable, Some(true));
        assert_eq!(saved.frequency_integer, Some(87));
        assert_eq!(saved.frequency_fraction, Some(9));
    }

    #[test]
    fn test_registry_lookup() {
        let registry = InMemoryApplicationRegistry::new();
        registry.register(7, "Nav", "Phone");
        assert_eq!(registry.device_name(7).as_deref(), Some("Phone"));
        assert_eq!(registry.device_name(8), None);
        assert!(registry.unregister(7).is_some());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_access_mode_resolver() {
        let settings = Arc::new(InMemorySettings::new());
        let resolver = AccessModeConsentResolver::new(settings.clone());
        let (handle, mut rx) = RcHandle::channel();
        let request = RpcRequest::new(
            1,
            "RC.GetInteriorVehicleDataConsent",
            Some(json!({"appID": 1, "moduleType": "CLIMATE"})),
        );

        resolver.request_consent(handle.pending_consent(request.clone()));
        assert!(matches!(
            rx.try_recv().unwrap(),
            RcCommand::ConsentDecided { allowed: true, .. }
        ));

        settings.set_reverse_access_mode(AccessMode::AutoDeny);
        resolver.request_consent(handle.pending_consent(request.clone()));
        assert!(matches!(
            rx.try_recv().unwrap(),
            RcCommand::ConsentDecided { allowed: false, .. }
        ));

        settings.set_reverse_access_mode(AccessMode::AskDriver);
        resolver.request_consent(handle.pending_consent(request));
        assert!(rx.try_recv().is_err());
        assert_eq!(resolver.queue().pending_count(), 1);
    }
}
