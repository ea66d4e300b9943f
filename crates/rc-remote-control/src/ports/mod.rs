//! Ports layer: the endpoint's driving hooks and driven collaborators.

pub mod inbound;
pub mod outbound;

pub use inbound::RpcObserver;
pub use outbound::{
    ApplicationRegistry, ClimateModel, ConsentResolver, RadioModel, RemoteControlSettings,
};

use std::sync::Arc;

/// The full set of collaborators injected into an endpoint.
#[derive(Clone)]
pub struct RcPorts {
    pub climate: Arc<dyn ClimateModel>,
    pub radio: Arc<dyn RadioModel>,
    pub registry: Arc<dyn ApplicationRegistry>,
    pub settings: Arc<dyn RemoteControlSettings>,
    pub consent: Arc<dyn ConsentResolver>,
}
