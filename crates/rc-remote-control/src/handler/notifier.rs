//! Notification emitter

use hmi_types::BusComponent;
use tracing::{debug, error};

use crate::domain::{
    AccessMode, ClimateControlData, DeviceInfo, DeviceRank, ModuleType, RadioControlData,
};
use crate::events::{
    DeviceRankChangedParams, InteriorVehicleDataParams, RcNotificationParams,
    RemoteControlSettingsParams,
};

use super::reply::ReplySender;

/// Builds and sends the RC notifications.
///
/// Each method returns whether a frame was sent.
#[derive(Clone)]
pub struct NotificationEmitter {
    component: BusComponent,
    reply: ReplySender,
}

impl NotificationEmitter {
    pub fn new(component: BusComponent, reply: ReplySender) -> Self {
        Self { component, reply }
    }

    pub fn on_remote_control_settings(&self, allowed: bool, access_mode: AccessMode) -> bool {
        self.emit(&RemoteControlSettingsParams::new(allowed, access_mode))
    }

    /// Suppressed when there is no device to report.
    pub fn on_device_rank_changed(&self, device: Option<&DeviceInfo>, rank: DeviceRank) -> bool {
        match DeviceRankChangedParams::new(device, rank) {
            Some(params) => self.emit(&params),
            None => {
                debug!(?rank, "Device rank change without device, not notifying");
                false
            }
        }
    }

    pub fn on_interior_vehicle_data(
        &self,
        module_type: ModuleType,
        climate: Option<ClimateControlData>,
        radio: Option<RadioControlData>,
    ) -> bool {
        self.emit(&InteriorVehicleDataParams::new(module_type, climate, radio))
    }

    fn emit<P: RcNotificationParams>(&self, params: &P) -> bool {
        let method = self.component.qualify(P::METHOD);
        match serde_json::to_value(params) {
            Ok(value) => self.reply.send_notification(&method, value),
            Err(e) => {
                error!(method = %method, error = %e, "Failed to encode notification");
                false
            }
        }
    }
}
