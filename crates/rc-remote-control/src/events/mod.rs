//! Events Layer - RC message types
//!
//! Requests the endpoint accepts, results and notifications it emits, and
//! commands local subsystems send it.

pub mod commands;
pub mod notifications;
pub mod requests;
pub mod responses;

pub use commands::{PendingConsent, RcCommand, RcHandle};
pub use notifications::{
    DeviceRankChangedParams, InteriorVehicleDataParams, RcNotificationParams,
    RemoteControlSettingsParams,
};
pub use requests::{
    decode_params, GetInteriorVehicleDataParams, RcMethod, SetInteriorVehicleDataParams,
};
pub use responses::{
    ConsentResult, GetCapabilitiesResult, GetInteriorVehicleDataResult, IsReadyResult,
    SetInteriorVehicleDataResult,
};
