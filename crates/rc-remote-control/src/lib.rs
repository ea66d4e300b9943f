//! # RC Remote Control
//!
//! The `RC` component of the head-unit middleware bus. Lets a mobile
//! application running on the driver's device read and change the state of
//! the climate and radio modules, and tells the middleware about driver
//! consent and remote-control settings.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure logic, no I/O
//!   - `ModuleData`, climate and radio payloads
//!   - `consented_app_check`: the driver-device consent rule
//!   - `aggregate_capabilities`: merged capability descriptor
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `RpcObserver`: Driving port (bus lifecycle and traffic hooks)
//!   - `ClimateModel`, `RadioModel`, `ApplicationRegistry`,
//!     `RemoteControlSettings`, `ConsentResolver`: Driven ports
//!
//! - **Service Layer** (`service/`): `RemoteControlService` runs each
//!   request against the ports
//!
//! - **Handler Layer** (`handler/`): `RcEndpoint` validates and dispatches
//!   requests; `ReplySender` and `NotificationEmitter` encode frames
//!
//! - **Events Layer** (`events/`): request params, result payloads,
//!   notification params and `RcHandle` commands
//!
//! - **Adapters Layer** (`adapters/`): `RcBusAdapter` and in-memory
//!   reference subsystems
//!
//! ## Methods
//!
//! | Method | Reply |
//! |--------|-------|
//! | `RC.IsReady` | `{available, code, method}` |
//! | `RC.GetCapabilities` | `{code, method, remoteControlCapability}` |
//! | `RC.SetInteriorVehicleData` | `{code, method, moduleData}` or error |
//! | `RC.GetInteriorVehicleData` | `{code, method, moduleData, isSubscribed?}` or error |
//! | `RC.GetInteriorVehicleDataConsent` | deferred `{code, method, allowed}` |
//!
//! Notifications: `RC.OnRemoteControlSettings`, `RC.OnDeviceRankChanged`,
//! `RC.OnInteriorVehicleData`.
//!
//! Malformed requests and unknown `RC.*` methods are dropped without a
//! reply.
//!
//! ## Wiring
//!
//! ```ignore
//! use rc_remote_control::{RcBusAdapter, RcConfig, RcPorts, Metrics};
//! use hmi_bus::InMemoryBus;
//! use std::sync::Arc;
//!
//! let bus = Arc::new(InMemoryBus::new());
//! let adapter = RcBusAdapter::new(RcConfig::default(), ports, bus, Arc::new(Metrics::new()))?;
//! let handle = adapter.handle();
//! tokio::spawn(adapter.run());
//!
//! // Later, from the settings subsystem:
//! handle.remote_control_settings_changed(true, AccessMode::AskDriver);
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod events;
pub mod handler;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use adapters::RcBusAdapter;
pub use config::{ConfigError, RcConfig, DEFAULT_COMPONENT_ID, DEFAULT_COMPONENT_NAME};
pub use domain::{AccessMode, AppId, DeviceInfo, DeviceRank, ModuleData, ModuleKind, ModuleType};
pub use error::{ModelError, RcError};
pub use events::{PendingConsent, RcCommand, RcHandle, RcMethod};
pub use handler::RcEndpoint;
pub use metrics::{DropReason, Metrics, MetricsRecorder, MetricsSnapshot, NoOpMetrics};
pub use ports::{RcPorts, RpcObserver};
pub use service::RemoteControlService;
