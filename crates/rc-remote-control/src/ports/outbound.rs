//! Outbound Ports (Driven Ports)
//!
//! Collaborators the endpoint depends on. All are synchronous and are called
//! inline from the single endpoint task, so implementations use interior
//! mutability where they hold state.

use crate::domain::{
    AccessMode, AppId, ApplicationInfo, ButtonCapabilities, ClimateControlCapabilities,
    ClimateControlData, ConsentState, DeviceInfo, RadioControlCapabilities, RadioControlData,
};
use crate::error::ModelError;
use crate::events::PendingConsent;

/// Live climate subsystem state.
pub trait ClimateModel: Send + Sync {
    fn climate_control_capabilities(&self) -> Vec<ClimateControlCapabilities>;

    fn climate_button_capabilities(&self) -> Vec<ButtonCapabilities>;

    /// Current climate state.
    fn climate_control_data(&self) -> ClimateControlData;

    /// Apply a partial update and return the authoritative post-write state
    /// of the fields that were written.
    fn set_climate_data(&self, data: &ClimateControlData)
        -> Result<ClimateControlData, ModelError>;
}

/// Live radio subsystem state.
pub trait RadioModel: Send + Sync {
    fn radio_control_capabilities(&self) -> Vec<RadioControlCapabilities>;

    fn radio_button_capabilities(&self) -> Vec<ButtonCapabilities>;

    /// Current radio state.
    fn radio_control_data(&self) -> RadioControlData;

    /// Apply a partial update and return the authoritative post-write state
    /// of the fields that were written.
    fn set_radio_data(&self, data: &RadioControlData) -> Result<RadioControlData, ModelError>;

    /// Validate requested tuning against the band's boundaries.
    ///
    /// The error message is returned to the caller verbatim.
    fn check_frequency_boundaries(&self, data: &RadioControlData) -> Result<(), ModelError>;

    /// Whether the radio is currently switched on.
    fn is_radio_enabled(&self) -> bool;

    /// Persist the current station and options.
    fn save_current_options(&self);
}

/// Registry of applications known to SDL core.
pub trait ApplicationRegistry: Send + Sync {
    fn application(&self, app_id: AppId) -> Option<ApplicationInfo>;

    /// Name of the device `app_id` runs on.
    fn device_name(&self, app_id: AppId) -> Option<String> {
        self.application(app_id).map(|app| app.device_name)
    }
}

/// Global remote-control settings.
pub trait RemoteControlSettings: Send + Sync {
    fn driver_device(&self) -> Option<DeviceInfo>;

    fn reverse_functionality_enabled(&self) -> bool;

    fn reverse_access_mode(&self) -> AccessMode;

    /// All three values read together.
    fn consent_state(&self) -> ConsentState {
        ConsentState {
            driver_device: self.driver_device(),
            reverse_functionality_enabled: self.reverse_functionality_enabled(),
            reverse_access_mode: self.reverse_access_mode(),
        }
    }
}

/// Human-in-the-loop consent prompt.
///
/// Receives `GetInteriorVehicleDataConsent` requests. The decision is
/// delivered later with [`PendingConsent::resolve`]; dropping the ticket
/// leaves the request unanswered.
pub trait ConsentResolver: Send + Sync {
    fn request_consent(&self, pending: PendingConsent);
}
