//! Adapters Layer
//!
//! - `RcBusAdapter` - Drives the endpoint from a bus connection
//! - `reference_models` - In-memory subsystems for the runtime and tests

pub mod bus_adapter;
pub mod reference_models;

pub use bus_adapter::RcBusAdapter;
pub use reference_models::{
    AccessModeConsentResolver, InMemoryApplicationRegistry, InMemorySettings,
    QueuedConsentResolver, ReferenceClimateModel, ReferenceRadioModel,
};
