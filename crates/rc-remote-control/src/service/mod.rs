//! Service Layer
//!
//! Request orchestration over the driven ports.

pub mod remote_control_service;

pub use remote_control_service::{RemoteControlService, APP_ID_MISSING, RADIO_NOT_ACTIVE};
