//! Remote Control Service
//!
//! Orchestrates the consent rule, precondition checks and subsystem models
//! for each request. Knows nothing about the bus; the dispatcher turns its
//! results into replies.

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::domain::{
    aggregate_capabilities, consented_app_check, ModuleData, ModuleKind, ModuleType,
    RemoteControlCapability,
};
use crate::error::{RcError, Result};
use crate::events::{
    decode_params, GetInteriorVehicleDataParams, PendingConsent, SetInteriorVehicleDataParams,
};
use crate::ports::RcPorts;

/// Reply message when radio data arrives while the radio is off.
pub const RADIO_NOT_ACTIVE: &str = "Radio module must be activated.";

/// Reply message for a read without `appID`.
pub const APP_ID_MISSING: &str = "appID parameter missing!";

/// Remote Control service
///
/// Holds the injected collaborators. Every call reads live subsystem state;
/// nothing is cached between requests.
pub struct RemoteControlService {
    ports: RcPorts,
    available: bool,
}

impl RemoteControlService {
    pub fn new(ports: RcPorts, available: bool) -> Self {
        Self { ports, available }
    }

    pub fn ports(&self) -> &RcPorts {
        &self.ports
    }

    /// Availability reported by `IsReady`.
    pub fn is_ready(&self) -> bool {
        self.available
    }

    pub fn capabilities(&self) -> RemoteControlCapability {
        aggregate_capabilities(self.ports.climate.as_ref(), self.ports.radio.as_ref())
    }

    /// Fail with `ConsentRejected` unless the requesting app may access
    /// module data.
    pub fn check_consent(&self, params: &Map<String, Value>) -> Result<()> {
        if consented_app_check(
            params,
            self.ports.registry.as_ref(),
            self.ports.settings.as_ref(),
        ) {
            Ok(())
        } else {
            Err(RcError::ConsentRejected)
        }
    }

    /// Apply a module write.
    ///
    /// Radio preconditions are checked before anything is written. The
    /// returned module data holds only the portions that were written.
    pub fn set_interior_vehicle_data(&self, params: &Map<String, Value>) -> Result<ModuleData> {
        self.check_consent(params)?;
        let request: SetInteriorVehicleDataParams = decode_params(params)?;
        let module_data = request.module_data;

        if let Some(radio) = &module_data.radio_control_data {
            if radio.radio_enable.is_none() && !self.ports.radio.is_radio_enabled() {
                return Err(RcError::Ignored(RADIO_NOT_ACTIVE.to_string()));
            }
            self.ports.radio.check_frequency_boundaries(radio)?;
        }

        let mut written = ModuleData::echo(module_data.module_type.clone());
        if let Some(climate) = &module_data.climate_control_data {
            written.climate_control_data = Some(self.ports.climate.set_climate_data(climate)?);
        }
        if let Some(radio) = &module_data.radio_control_data {
            written.radio_control_data = Some(self.ports.radio.set_radio_data(radio)?);
            if self.ports.radio.is_radio_enabled() {
                self.ports.radio.save_current_options();
            }
        }

        debug!(
            module_type = written.module_type.as_ref().map_or("<none>", ModuleKind::as_str),
            climate = written.climate_control_data.is_some(),
            radio = written.radio_control_data.is_some(),
            "Module data written"
        );
        Ok(written)
    }

    /// Read one module's current state.
    ///
    /// Returns the module data and the echo of `subscribe`, if given.
    pub fn get_interior_vehicle_data(
        &self,
        params: &Map<String, Value>,
    ) -> Result<(ModuleData, Option<bool>)> {
        if params.get("appID").map_or(true, Value::is_null) {
            return Err(RcError::InvalidData(APP_ID_MISSING.to_string()));
        }
        self.check_consent(params)?;
        let request: GetInteriorVehicleDataParams = decode_params(params)?;

        if self.ports.registry.application(request.app_id).is_none() {
            debug!(app_id = request.app_id, "Reading module data for unregistered app");
        }

        let requested = request.module_type.as_ref().and_then(ModuleKind::known);
        let echo = ModuleData::echo(request.module_type);
        let data = match requested {
            Some(ModuleType::Climate) => {
                echo.with_climate(self.ports.climate.climate_control_data())
            }
            Some(ModuleType::Radio) => echo.with_radio(self.ports.radio.radio_control_data()),
            None => {
                debug!(
                    module_type = echo.module_type.as_ref().map_or("<none>", ModuleKind::as_str),
                    "No module data for requested type"
                );
                echo
            }
        };
        Ok((data, request.subscribe))
    }

    /// Hand a consent request to the resolver. The reply comes later.
    pub fn request_consent(&self, pending: PendingConsent) {
        info!(
            id = %pending.request().id,
            app_id = ?pending.app_id(),
            "Forwarding consent request"
        );
        self.ports.consent.request_consent(pending);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        AccessMode, AppId, ApplicationInfo, ButtonCapabilities, ClimateControlCapabilities,
        ClimateControlData, DeviceInfo, FrequencyBounds, RadioBand, RadioControlCapabilities,
        RadioControlData,
    };
    use crate::error::ModelError;
    use crate::events::RcHandle;
    use crate::ports::{
        ApplicationRegistry, ClimateModel, ConsentResolver, RadioModel, RemoteControlSettings,
    };
    use hmi_types::{ResultCode, RpcRequest};
    use parking_lot::Mutex;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct CountingClimate {
        calls: AtomicUsize,
        state: Mutex<ClimateControlData>,
    }

    impl ClimateModel for CountingClimate {
        fn climate_control_capabilities(&self) -> Vec<ClimateControlCapabilities> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            vec![ClimateControlCapabilities {
                module_name: "Climate".into(),
                ..Default::default()
            }]
        }

        fn climate_button_capabilities(&self) -> Vec<ButtonCapabilities> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            vec![ButtonCapabilities::pressable("AC")]
        }

        fn climate_control_data(&self) -> ClimateControlData {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.state.lock().clone()
        }

        fn set_climate_data(
            &self,
            data: &ClimateControlData,
        ) -> std::result::Result<ClimateControlData, ModelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.state.lock().apply(data);
            Ok(data.clone())
        }
    }

    #[derive(Default)]
    struct CountingRadio {
        calls: AtomicUsize,
        saves: AtomicUsize,
        state: Mutex<RadioControlData>,
    }

    impl CountingRadio {
        fn enabled() -> Self {
            let radio = Self::default();
            radio.state.lock().radio_enable = Some(true);
            radio
        }
    }

    impl RadioModel for CountingRadio {
        fn radio_control_capabilities(&self) -> Vec<RadioControlCapabilities> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            vec![RadioControlCapabilities {
                module_name: "Radio".into(),
                ..Default::default()
            }]
        }

        fn radio_button_capabilities(&self) -> Vec<ButtonCapabilities> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            vec![ButtonCapabilities::pressable("VOLUME_UP")]
        }

        fn radio_control_data(&self) -> RadioControlData {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.state.lock().clone()
        }

        fn set_radio_data(
            &self,
            data: &RadioControlData,
        ) -> std::result::Result<RadioControlData, ModelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.state.lock().apply(data);
            Ok(data.clone())
        }

        fn check_frequency_boundaries(
            &self,
            data: &RadioControlData,
        ) -> std::result::Result<(), ModelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match data.frequency_integer {
                Some(integer) => FrequencyBounds::for_band(data.band.unwrap_or(RadioBand::Fm))
                    .check(integer, data.frequency_fraction.unwrap_or(0)),
                None => Ok(()),
            }
        }

        fn is_radio_enabled(&self) -> bool {
            self.state.lock().radio_enable.unwrap_or(false)
        }

        fn save_current_options(&self) {
            self.saves.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Registry;

    impl ApplicationRegistry for Registry {
        fn application(&self, app_id: AppId) -> Option<ApplicationInfo> {
            let device_name = match app_id {
                1 => "Driver Phone",
                2 => "Passenger Phone",
                _ => return None,
            };
            Some(ApplicationInfo {
                app_id,
                app_name: format!("App {}", app_id),
                device_name: device_name.into(),
            })
        }
    }

    struct Settings;

    impl RemoteControlSettings for Settings {
        fn driver_device(&self) -> Option<DeviceInfo> {
            Some(DeviceInfo::new("Driver Phone"))
        }
        fn reverse_functionality_enabled(&self) -> bool {
            true
        }
        fn reverse_access_mode(&self) -> AccessMode {
            AccessMode::AskDriver
        }
    }

    #[derive(Default)]
    struct Resolver {
        pending: Mutex<Vec<PendingConsent>>,
    }

    impl ConsentResolver for Resolver {
        fn request_consent(&self, pending: PendingConsent) {
            self.pending.lock().push(pending);
        }
    }

    struct Fixture {
        climate: Arc<CountingClimate>,
        radio: Arc<CountingRadio>,
        resolver: Arc<Resolver>,
        service: RemoteControlService,
    }

    fn fixture(radio: CountingRadio) -> Fixture {
        let climate = Arc::new(CountingClimate::default());
        let radio = Arc::new(radio);
        let resolver = Arc::new(Resolver::default());
        let ports = RcPorts {
            climate: climate.clone(),
            radio: radio.clone(),
            registry: Arc::new(Registry),
            settings: Arc::new(Settings),
            consent: resolver.clone(),
        };
        Fixture {
            climate,
            radio,
            resolver,
            service: RemoteControlService::new(ports, true),
        }
    }

    fn params(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn model_calls(f: &Fixture) -> usize {
        f.climate.calls.load(Ordering::SeqCst) + f.radio.calls.load(Ordering::SeqCst)
    }

    #[test]
    fn test_capabilities_queried_live() {
        let f = fixture(CountingRadio::default());
        let caps = f.service.capabilities();
        assert_eq!(caps.button_capabilities[0].name, "AC");
        assert_eq!(caps.button_capabilities[1].name, "VOLUME_UP");

        f.service.capabilities();
        assert_eq!(model_calls(&f), 8);
    }

    #[test]
    fn test_set_rejected_for_passenger_without_model_call() {
        let f = fixture(CountingRadio::enabled());
        let err = f
            .service
            .set_interior_vehicle_data(&params(json!({
                "appID": 2,
                "moduleData": {"moduleType": "CLIMATE", "climateControlData": {"fanSpeed": 5}}
            })))
            .unwrap_err();

        assert_eq!(err, RcError::ConsentRejected);
        assert_eq!(model_calls(&f), 0);
    }

    #[test]
    fn test_get_rejected_for_passenger_without_model_call() {
        let f = fixture(CountingRadio::enabled());
        for module_type in ["CLIMATE", "RADIO"] {
            let err = f
                .service
                .get_interior_vehicle_data(&params(json!({
                    "appID": 2,
                    "moduleType": module_type,
                    "subscribe": true
                })))
                .unwrap_err();
            assert_eq!(err, RcError::ConsentRejected);
        }
        assert_eq!(model_calls(&f), 0);
    }

    #[test]
    fn test_set_radio_requires_activation() {
        let f = fixture(CountingRadio::default());
        let err = f
            .service
            .set_interior_vehicle_data(&params(json!({
                "appID": 1,
                "moduleData": {"moduleType": "RADIO", "radioControlData": {"radioEnable": null}}
            })))
            .unwrap_err();

        assert_eq!(err.code(), ResultCode::Ignored);
        assert_eq!(err.message().as_deref(), Some(RADIO_NOT_ACTIVE));
        assert_eq!(f.radio.state.lock().radio_enable, None);
    }

    #[test]
    fn test_set_radio_enable_passes_while_disabled() {
        let f = fixture(CountingRadio::default());
        let written = f
            .service
            .set_interior_vehicle_data(&params(json!({
                "appID": 1,
                "moduleData": {"moduleType": "RADIO", "radioControlData": {"radioEnable": true}}
            })))
            .unwrap();

        assert_eq!(
            written.radio_control_data.unwrap().radio_enable,
            Some(true)
        );
        assert_eq!(f.radio.saves.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_set_frequency_out_of_range_is_invalid_data() {
        let f = fixture(CountingRadio::enabled());
        let err = f
            .service
            .set_interior_vehicle_data(&params(json!({
                "appID": 1,
                "moduleData": {
                    "moduleType": "RADIO",
                    "radioControlData": {"band": "FM", "frequencyInteger": 200}
                }
            })))
            .unwrap_err();

        assert_eq!(err.code(), ResultCode::InvalidData);
        assert!(err.message().unwrap().contains("out of FM range"));
        assert_eq!(f.radio.state.lock().frequency_integer, None);
    }

    #[test]
    fn test_set_echoes_only_written_portions() {
        let f = fixture(CountingRadio::enabled());
        let written = f
            .service
            .set_interior_vehicle_data(&params(json!({
                "appID": 1,
                "moduleData": {"moduleType": "CLIMATE", "climateControlData": {"acEnable": true}}
            })))
            .unwrap();

        assert_eq!(written.known_type(), Some(ModuleType::Climate));
        assert_eq!(
            written.climate_control_data.unwrap().ac_enable,
            Some(true)
        );
        assert!(written.radio_control_data.is_none());
        assert_eq!(f.radio.saves.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_get_requires_app_id() {
        let f = fixture(CountingRadio::enabled());
        for p in [json!({"moduleType": "RADIO"}), json!({"appID": null, "moduleType": "RADIO"})] {
            let err = f.service.get_interior_vehicle_data(&params(p)).unwrap_err();
            assert_eq!(err, RcError::InvalidData(APP_ID_MISSING.into()));
        }
        assert_eq!(model_calls(&f), 0);
    }

    #[test]
    fn test_get_returns_requested_module_only() {
        let f = fixture(CountingRadio::enabled());
        let (data, subscribed) = f
            .service
            .get_interior_vehicle_data(&params(json!({
                "appID": 1,
                "moduleType": "RADIO",
                "subscribe": false
            })))
            .unwrap();

        assert_eq!(data.known_type(), Some(ModuleType::Radio));
        assert!(data.climate_control_data.is_none());
        assert_eq!(data.radio_control_data.unwrap().radio_enable, Some(true));
        assert_eq!(subscribed, Some(false));
    }

    #[test]
    fn test_get_unknown_or_missing_module_type_echoes_without_payload() {
        let f = fixture(CountingRadio::enabled());

        let (seat, subscribed) = f
            .service
            .get_interior_vehicle_data(&params(json!({
                "appID": 1,
                "moduleType": "SEAT",
                "subscribe": true
            })))
            .unwrap();
        assert_eq!(seat, ModuleData::echo(Some(ModuleKind::Unknown("SEAT".into()))));
        assert_eq!(subscribed, Some(true));

        let (missing, _) = f
            .service
            .get_interior_vehicle_data(&params(json!({"appID": 1})))
            .unwrap();
        assert_eq!(missing, ModuleData::echo(None));
        assert_eq!(model_calls(&f), 0);
    }

    #[test]
    fn test_set_with_unknown_module_type_writes_payload() {
        let f = fixture(CountingRadio::enabled());
        let written = f
            .service
            .set_interior_vehicle_data(&params(json!({
                "appID": 1,
                "moduleData": {"moduleType": "SEAT", "climateControlData": {"fanSpeed": 10}}
            })))
            .unwrap();

        assert_eq!(written.module_type, Some(ModuleKind::Unknown("SEAT".into())));
        assert_eq!(written.climate_control_data.unwrap().fan_speed, Some(10));
    }

    #[test]
    fn test_consent_request_forwarded() {
        let f = fixture(CountingRadio::default());
        let (handle, _rx) = RcHandle::channel();
        let request = RpcRequest::new(
            4,
            "RC.GetInteriorVehicleDataConsent",
            Some(json!({"appID": 2, "moduleType": "CLIMATE"})),
        );
        f.service.request_consent(handle.pending_consent(request));

        let pending = f.resolver.pending.lock();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].app_id(), Some(2));
    }
}
