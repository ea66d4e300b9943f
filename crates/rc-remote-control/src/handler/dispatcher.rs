//! RPC dispatcher for the RC component
//!
//! Validates inbound requests, routes them to the service and encodes the
//! outcome. Rules:
//! - A request that fails the structural check is dropped without reply.
//! - An unknown `RC.*` method is dropped without reply.
//! - Every other request gets exactly one reply carrying its id, except
//!   `GetInteriorVehicleDataConsent`, which is answered once the consent
//!   resolver decides.

use std::sync::Arc;
use std::time::Instant;

use hmi_bus::BusClient;
use hmi_types::{
    BusComponent, InboundFrame, RpcErrorReply, RpcNotification, RpcRequest, RpcResponse,
};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::config::RcConfig;
use crate::error::{RcError, Result};
use crate::events::{
    ConsentResult, GetCapabilitiesResult, GetInteriorVehicleDataResult, IsReadyResult,
    RcCommand, RcHandle, RcMethod, SetInteriorVehicleDataResult,
};
use crate::metrics::{DropReason, MetricsRecorder};
use crate::ports::{RcPorts, RpcObserver};
use crate::service::RemoteControlService;

use super::notifier::NotificationEmitter;
use super::reply::ReplySender;

/// The RC bus endpoint.
///
/// Owned by a single task; every hook runs to completion before the next
/// event is handled.
pub struct RcEndpoint {
    component: BusComponent,
    service: RemoteControlService,
    reply: ReplySender,
    notifier: NotificationEmitter,
    handle: RcHandle,
    metrics: Arc<dyn MetricsRecorder>,
    registered: bool,
}

impl RcEndpoint {
    pub fn new(
        config: &RcConfig,
        ports: RcPorts,
        client: Arc<dyn BusClient>,
        metrics: Arc<dyn MetricsRecorder>,
        handle: RcHandle,
    ) -> Self {
        let component = config.component();
        let reply = ReplySender::new(client, metrics.clone());
        let notifier = NotificationEmitter::new(component.clone(), reply.clone());
        Self {
            component,
            service: RemoteControlService::new(ports, config.is_ready),
            reply,
            notifier,
            handle,
            metrics,
            registered: false,
        }
    }

    pub fn component(&self) -> &BusComponent {
        &self.component
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    pub fn notifier(&self) -> &NotificationEmitter {
        &self.notifier
    }

    pub fn reply(&self) -> &ReplySender {
        &self.reply
    }

    /// Route one inbound frame to its hook.
    pub fn handle_frame(&mut self, frame: InboundFrame) {
        match frame {
            InboundFrame::Request(request) => self.on_request(request),
            InboundFrame::Notification(notification) => self.on_notification(notification),
            InboundFrame::Response(response) => self.on_result(response),
            InboundFrame::Error(error) => self.on_error(error),
        }
    }

    /// Run a local command. Returns `false` when the command asks the
    /// endpoint to leave the bus; the caller performs the disconnect.
    pub fn handle_command(&mut self, command: RcCommand) -> bool {
        match command {
            RcCommand::DeviceRankChanged { device, rank } => {
                self.notifier.on_device_rank_changed(device.as_ref(), rank);
            }
            RcCommand::InteriorVehicleDataChanged {
                module_type,
                climate,
                radio,
            } => {
                self.notifier
                    .on_interior_vehicle_data(module_type, climate, radio);
            }
            RcCommand::RemoteControlSettingsChanged {
                allowed,
                access_mode,
            } => {
                self.notifier.on_remote_control_settings(allowed, access_mode);
            }
            RcCommand::ConsentDecided { request, allowed } => {
                self.consent_decided(&request, allowed);
            }
            RcCommand::Disconnect => return false,
        }
        true
    }

    /// Answer a deferred consent request with the user's decision.
    pub fn consent_decided(&self, request: &RpcRequest, allowed: bool) -> bool {
        info!(id = %request.id, allowed, "Consent decided");
        match encode(&ConsentResult::new(&request.method, allowed)) {
            Ok(result) => self.reply.send_result(&request.id, result),
            Err(e) => self.reply.send_error(
                e.code(),
                &request.id,
                &request.method,
                e.message().as_deref(),
            ),
        }
    }

    /// Emit `OnRemoteControlSettings` from the current settings.
    pub fn notify_remote_control_settings(&self) -> bool {
        let state = self.service.ports().settings.consent_state();
        self.notifier.on_remote_control_settings(
            state.reverse_functionality_enabled,
            state.reverse_access_mode,
        )
    }

    /// Structural check. `None` means the request is dropped.
    fn validate(&self, request: &RpcRequest) -> Option<RcMethod> {
        let Some(short) = self.component.short_method(&request.method) else {
            self.drop_request(request, DropReason::Malformed, "method is not an RC method");
            return None;
        };
        let Some(method) = RcMethod::from_short_name(short) else {
            self.drop_request(request, DropReason::UnknownMethod, "unknown method");
            return None;
        };
        if method.requires_params() {
            let Some(params) = request.params_object() else {
                self.drop_request(request, DropReason::Malformed, "params object missing");
                return None;
            };
            if method == RcMethod::SetInteriorVehicleData
                && !params.get("moduleData").map_or(false, Value::is_object)
            {
                self.drop_request(request, DropReason::Malformed, "moduleData object missing");
                return None;
            }
        }
        Some(method)
    }

    fn drop_request(&self, request: &RpcRequest, reason: DropReason, detail: &str) {
        warn!(
            id = %request.id,
            method = %request.method,
            reason = reason.as_str(),
            "Dropping request: {}",
            detail
        );
        self.metrics.record_dropped(reason);
    }

    /// `Ok(None)` means the reply is deferred.
    fn dispatch(&self, method: RcMethod, request: &RpcRequest) -> Result<Option<Value>> {
        let empty = Map::new();
        let params = request.params_object().unwrap_or(&empty);
        let name = request.method.as_str();

        let result = match method {
            RcMethod::IsReady => encode(&IsReadyResult::new(name, self.service.is_ready()))?,
            RcMethod::GetCapabilities => {
                encode(&GetCapabilitiesResult::new(name, self.service.capabilities()))?
            }
            RcMethod::SetInteriorVehicleData => {
                let written = self.service.set_interior_vehicle_data(params)?;
                encode(&SetInteriorVehicleDataResult::new(name, written))?
            }
            RcMethod::GetInteriorVehicleData => {
                let (data, subscribed) = self.service.get_interior_vehicle_data(params)?;
                encode(&GetInteriorVehicleDataResult::new(name, data, subscribed))?
            }
            RcMethod::GetInteriorVehicleDataConsent => {
                self.service
                    .request_consent(self.handle.pending_consent(request.clone()));
                return Ok(None);
            }
        };
        Ok(Some(result))
    }
}

fn encode<T: Serialize>(result: &T) -> Result<Value> {
    serde_json::to_value(result).map_err(|e| RcError::Encode(e.to_string()))
}

impl RpcObserver for RcEndpoint {
    fn on_registered(&mut self) {
        self.registered = true;
        info!(
            component = %self.component.name,
            component_id = self.component.id,
            "RC component registered"
        );
    }

    fn on_unregistered(&mut self) {
        self.registered = false;
        info!(component = %self.component.name, "RC component unregistered");
    }

    fn on_disconnected(&mut self) {
        self.registered = false;
        warn!(component = %self.component.name, "RC component lost its bus connection");
    }

    fn on_request(&mut self, request: RpcRequest) {
        let Some(method) = self.validate(&request) else {
            return;
        };
        debug!(id = %request.id, method = %request.method, "Request received");

        let start = Instant::now();
        match self.dispatch(method, &request) {
            Ok(Some(result)) => {
                self.reply.send_result(&request.id, result);
            }
            Ok(None) => {}
            Err(e) => {
                debug!(id = %request.id, method = %request.method, error = %e, "Request failed");
                self.reply.send_error(
                    e.code(),
                    &request.id,
                    &request.method,
                    e.message().as_deref(),
                );
            }
        }
        self.metrics.record_request(&request.method, start.elapsed());
    }

    fn on_result(&mut self, response: RpcResponse) {
        debug!(
            id = %response.id,
            method = response.method().unwrap_or("<none>"),
            "Result received"
        );
    }

    fn on_error(&mut self, error: RpcErrorReply) {
        warn!(
            id = %error.id,
            method = error.method().unwrap_or("<none>"),
            code = %error.error.code,
            "Error reply received"
        );
    }

    fn on_notification(&mut self, notification: RpcNotification) {
        debug!(method = %notification.method, "Notification received");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{
        InMemoryApplicationRegistry, InMemorySettings, QueuedConsentResolver,
        ReferenceClimateModel, ReferenceRadioModel,
    };
    use crate::domain::{AccessMode, DeviceInfo, DeviceRank};
    use crate::metrics::Metrics;
    use hmi_bus::InMemoryBus;
    use hmi_types::{OutboundFrame, ResultCode, RpcId};
    use serde_json::json;
    use std::sync::atomic::Ordering;

    struct Fixture {
        bus: Arc<InMemoryBus>,
        settings: Arc<InMemorySettings>,
        resolver: Arc<QueuedConsentResolver>,
        metrics: Arc<Metrics>,
        endpoint: RcEndpoint,
        commands: tokio::sync::mpsc::UnboundedReceiver<RcCommand>,
    }

    fn fixture() -> Fixture {
        let bus = Arc::new(InMemoryBus::new());
        let _subscription = bus.connect(&BusComponent::new("RC", 900)).unwrap();

        let registry = Arc::new(InMemoryApplicationRegistry::new());
        registry.register(1, "Nav", "Driver Phone");
        registry.register(2, "Music", "Passenger Phone");
        let settings = Arc::new(InMemorySettings::new());
        settings.set_driver_device(Some(DeviceInfo::new("Driver Phone")));
        settings.set_reverse_functionality_enabled(true);
        let resolver = Arc::new(QueuedConsentResolver::new());
        let metrics = Arc::new(Metrics::new());

        let ports = RcPorts {
            climate: Arc::new(ReferenceClimateModel::new()),
            radio: Arc::new(ReferenceRadioModel::new()),
            registry,
            settings: settings.clone(),
            consent: resolver.clone(),
        };
        let (handle, commands) = RcHandle::channel();
        let endpoint = RcEndpoint::new(
            &RcConfig::default(),
            ports,
            bus.clone(),
            metrics.clone(),
            handle,
        );
        Fixture {
            bus,
            settings,
            resolver,
            metrics,
            endpoint,
            commands,
        }
    }

    fn request(id: i64, method: &str, params: Option<Value>) -> RpcRequest {
        RpcRequest::new(id, method, params)
    }

    fn last(bus: &InMemoryBus) -> OutboundFrame {
        bus.sent_frames().pop().unwrap()
    }

    #[test]
    fn test_is_ready_reply() {
        let mut f = fixture();
        f.endpoint.on_request(request(1, "RC.IsReady", None));

        assert_eq!(
            last(&f.bus).to_value(),
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": {"available": true, "code": 0, "method": "RC.IsReady"}
            })
        );
        assert_eq!(f.metrics.requests_dispatched.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_capabilities_reply_lists_climate_buttons_first() {
        let mut f = fixture();
        f.endpoint.on_request(request(2, "RC.GetCapabilities", None));

        let value = last(&f.bus).to_value();
        let caps = &value["result"]["remoteControlCapability"];
        assert!(caps["climateControlCapabilities"].is_array());
        assert!(caps["radioControlCapabilities"].is_array());
        assert_eq!(caps["buttonCapabilities"][0]["name"], json!("AC_MAX"));
    }

    #[test]
    fn test_malformed_requests_dropped() {
        let mut f = fixture();
        f.endpoint.on_request(request(3, "IsReady", None));
        f.endpoint.on_request(request(4, "RC.", None));
        f.endpoint.on_request(request(5, "RC.GetInteriorVehicleData", None));
        f.endpoint.on_request(request(
            6,
            "RC.SetInteriorVehicleData",
            Some(json!({"appID": 1})),
        ));

        assert_eq!(f.bus.frames_sent(), 0);
        assert_eq!(f.metrics.frames_dropped.load(Ordering::Relaxed), 4);
    }

    #[test]
    fn test_unknown_method_dropped() {
        let mut f = fixture();
        f.endpoint.on_request(request(7, "RC.ButtonPress", Some(json!({}))));
        assert_eq!(f.bus.frames_sent(), 0);
        assert_eq!(f.metrics.frames_dropped.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_passenger_set_rejected_without_message() {
        let mut f = fixture();
        f.endpoint.on_request(request(
            8,
            "RC.SetInteriorVehicleData",
            Some(json!({
                "appID": 2,
                "moduleData": {"moduleType": "CLIMATE", "climateControlData": {"fanSpeed": 10}}
            })),
        ));

        assert_eq!(
            last(&f.bus).to_value(),
            json!({
                "jsonrpc": "2.0",
                "id": 8,
                "error": {"code": 4, "data": {"method": "RC.SetInteriorVehicleData"}}
            })
        );
        assert_eq!(f.metrics.consent_rejections.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_unknown_module_type_answered_without_payload() {
        let mut f = fixture();
        f.endpoint.on_request(request(
            9,
            "RC.GetInteriorVehicleData",
            Some(json!({"appID": 1, "moduleType": "SEAT"})),
        ));
        assert_eq!(
            last(&f.bus).to_value(),
            json!({
                "jsonrpc": "2.0",
                "id": 9,
                "result": {
                    "code": 0,
                    "method": "RC.GetInteriorVehicleData",
                    "moduleData": {"moduleType": "SEAT"}
                }
            })
        );

        f.endpoint.on_request(request(
            10,
            "RC.GetInteriorVehicleData",
            Some(json!({"appID": 1, "subscribe": false})),
        ));
        assert_eq!(
            last(&f.bus).to_value()["result"],
            json!({
                "code": 0,
                "method": "RC.GetInteriorVehicleData",
                "moduleData": {},
                "isSubscribed": false
            })
        );
    }

    #[test]
    fn test_consent_deferred_then_answered() {
        let mut f = fixture();
        let consent = request(
            10,
            "RC.GetInteriorVehicleDataConsent",
            Some(json!({"appID": 2, "moduleType": "RADIO"})),
        );
        f.endpoint.on_request(consent);
        assert_eq!(f.bus.frames_sent(), 0);

        let pending = f.resolver.take_pending();
        assert_eq!(pending.len(), 1);
        assert!(pending.into_iter().next().unwrap().resolve(true));

        let command = f.commands.try_recv().unwrap();
        assert!(f.endpoint.handle_command(command));
        assert_eq!(
            last(&f.bus).to_value(),
            json!({
                "jsonrpc": "2.0",
                "id": 10,
                "result": {
                    "code": 0,
                    "method": "RC.GetInteriorVehicleDataConsent",
                    "allowed": true
                }
            })
        );
    }

    #[test]
    fn test_settings_notification_reads_current_settings() {
        let f = fixture();
        f.settings.set_reverse_access_mode(AccessMode::AskDriver);
        assert!(f.endpoint.notify_remote_control_settings());
        assert_eq!(
            last(&f.bus).to_value()["params"],
            json!({"allowed": true, "accessMode": "ASK_DRIVER"})
        );

        f.settings.set_reverse_functionality_enabled(false);
        assert!(f.endpoint.notify_remote_control_settings());
        assert_eq!(last(&f.bus).to_value()["params"], json!({"allowed": false}));
    }

    #[test]
    fn test_commands_emit_notifications() {
        let mut f = fixture();
        assert!(f.endpoint.handle_command(RcCommand::DeviceRankChanged {
            device: None,
            rank: DeviceRank::Driver,
        }));
        assert_eq!(f.bus.frames_sent(), 0);

        assert!(f.endpoint.handle_command(RcCommand::DeviceRankChanged {
            device: Some(DeviceInfo::new("Passenger Phone")),
            rank: DeviceRank::Passenger,
        }));
        assert_eq!(
            last(&f.bus).method(),
            Some("RC.OnDeviceRankChanged")
        );
        assert!(!f.endpoint.handle_command(RcCommand::Disconnect));
    }

    #[test]
    fn test_lifecycle_hooks_track_registration() {
        let mut f = fixture();
        assert!(!f.endpoint.is_registered());
        f.endpoint.on_registered();
        assert!(f.endpoint.is_registered());
        f.endpoint.on_disconnected();
        assert!(!f.endpoint.is_registered());
    }

    #[test]
    fn test_inbound_replies_and_notifications_produce_nothing() {
        let mut f = fixture();
        f.endpoint.handle_frame(InboundFrame::Response(RpcResponse::new(
            RpcId::Number(1),
            json!({"code": 0, "method": "UI.Alert"}),
        )));
        f.endpoint.handle_frame(InboundFrame::Error(RpcErrorReply::new(
            RpcId::Number(2),
            ResultCode::GenericError,
            "UI.Alert",
            None,
        )));
        f.endpoint.handle_frame(InboundFrame::Notification(RpcNotification::new(
            "RC.OnSomething",
            json!({}),
        )));
        assert_eq!(f.bus.frames_sent(), 0);
    }
}
