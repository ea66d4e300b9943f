//! Commands delivered to a running endpoint
//!
//! Subsystems outside the bus talk to the endpoint through an [`RcHandle`].
//! Commands are processed in order on the endpoint task, interleaved with
//! inbound frames.

use hmi_types::RpcRequest;
use tokio::sync::mpsc;
use tracing::warn;

use crate::domain::{
    requested_app_id, AccessMode, AppId, ClimateControlData, DeviceInfo, DeviceRank, ModuleType,
    RadioControlData,
};

/// Work the endpoint performs on behalf of local subsystems.
#[derive(Debug, Clone, PartialEq)]
pub enum RcCommand {
    /// Emit `OnDeviceRankChanged`.
    DeviceRankChanged {
        device: Option<DeviceInfo>,
        rank: DeviceRank,
    },
    /// Emit `OnInteriorVehicleData`.
    InteriorVehicleDataChanged {
        module_type: ModuleType,
        climate: Option<ClimateControlData>,
        radio: Option<RadioControlData>,
    },
    /// Emit `OnRemoteControlSettings`.
    RemoteControlSettingsChanged {
        allowed: bool,
        access_mode: AccessMode,
    },
    /// Answer a deferred consent request.
    ConsentDecided { request: RpcRequest, allowed: bool },
    /// Leave the bus and stop the endpoint.
    Disconnect,
}

/// Cloneable sender side of the endpoint's command queue.
///
/// Every method returns `false` once the endpoint has stopped.
#[derive(Debug, Clone)]
pub struct RcHandle {
    sender: mpsc::UnboundedSender<RcCommand>,
}

impl RcHandle {
    /// Create a handle and the receiver the endpoint drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<RcCommand>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    pub fn send(&self, command: RcCommand) -> bool {
        self.sender.send(command).is_ok()
    }

    pub fn device_rank_changed(&self, device: Option<DeviceInfo>, rank: DeviceRank) -> bool {
        self.send(RcCommand::DeviceRankChanged { device, rank })
    }

    pub fn interior_vehicle_data_changed(
        &self,
        module_type: ModuleType,
        climate: Option<ClimateControlData>,
        radio: Option<RadioControlData>,
    ) -> bool {
        self.send(RcCommand::InteriorVehicleDataChanged {
            module_type,
            climate,
            radio,
        })
    }

    pub fn remote_control_settings_changed(
        &self,
        allowed: bool,
        access_mode: AccessMode,
    ) -> bool {
        self.send(RcCommand::RemoteControlSettingsChanged {
            allowed,
            access_mode,
        })
    }

    pub fn consent_decided(&self, request: RpcRequest, allowed: bool) -> bool {
        self.send(RcCommand::ConsentDecided { request, allowed })
    }

    pub fn disconnect(&self) -> bool {
        self.send(RcCommand::Disconnect)
    }

    /// Wrap a consent request into a ticket that answers through this handle.
    pub fn pending_consent(&self, request: RpcRequest) -> PendingConsent {
        PendingConsent {
            request,
            handle: self.clone(),
        }
    }

    /// Whether the endpoint is still draining commands.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// An unanswered `GetInteriorVehicleDataConsent` request.
///
/// Resolving consumes the ticket, so a request is answered at most once.
#[derive(Debug)]
pub struct PendingConsent {
    request: RpcRequest,
    handle: RcHandle,
}

impl PendingConsent {
    /// The original request, id included.
    pub fn request(&self) -> &RpcRequest {
        &self.request
    }

    pub fn app_id(&self) -> Option<AppId> {
        self.request.params_object().and_then(requested_app_id)
    }

    /// Send the user's decision back to the endpoint.
    pub fn resolve(self, allowed: bool) -> bool {
        let sent = self.handle.consent_decided(self.request, allowed);
        if !sent {
            warn!(allowed, "Consent decided after the endpoint stopped");
        }
        sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_commands_arrive_in_order() {
        let (handle, mut rx) = RcHandle::channel();
        assert!(handle.remote_control_settings_changed(true, Default::default()));
        assert!(handle.disconnect());

        assert!(matches!(
            rx.try_recv().unwrap(),
            RcCommand::RemoteControlSettingsChanged { allowed: true, .. }
        ));
        assert_eq!(rx.try_recv().unwrap(), RcCommand::Disconnect);
    }

    #[test]
    fn test_pending_consent_resolves_with_original_request() {
        let (handle, mut rx) = RcHandle::channel();
        let request = RpcRequest::new(
            17,
            "RC.GetInteriorVehicleDataConsent",
            Some(json!({"appID": 3, "moduleType": "RADIO"})),
        );
        let pending = handle.pending_consent(request.clone());
        assert_eq!(pending.app_id(), Some(3));
        assert!(pending.resolve(false));

        assert_eq!(
            rx.try_recv().unwrap(),
            RcCommand::ConsentDecided {
                request,
                allowed: false
            }
        );
    }

    #[test]
    fn test_handle_reports_stopped_endpoint() {
        let (handle, rx) = RcHandle::channel();
        drop(rx);
        assert!(handle.is_closed());
        assert!(!handle.disconnect());

        let pending = handle.pending_consent(RpcRequest::new(1, "RC.X", None));
        assert!(!pending.resolve(true));
    }
}
