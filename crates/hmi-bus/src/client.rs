//! # Bus Client
//!
//! The transport port every component is written against.

use hmi_types::{BusComponent, InboundFrame, OutboundFrame, TypesError};
use thiserror::Error;

use crate::subscription::BusSubscription;

/// Errors from transport operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BusError {
    /// No component is registered on this client.
    #[error("Not connected to the bus")]
    NotConnected,

    /// A component is already registered on this client.
    #[error("Component {0} is already connected")]
    AlreadyConnected(String),

    /// Raw inbound text could not be decoded into a frame.
    #[error("Failed to decode frame: {0}")]
    Decode(#[from] TypesError),

    /// The receiving side of the event channel is gone.
    #[error("Event channel closed")]
    Closed,
}

/// Lifecycle and traffic events delivered to a connected component.
#[derive(Debug, Clone, PartialEq)]
pub enum BusEvent {
    /// The bus acknowledged the component's registration.
    Registered,
    /// The bus withdrew the component's registration.
    Unregistered,
    /// The underlying connection was lost.
    Disconnected,
    /// A decoded frame addressed to the component.
    Frame(InboundFrame),
}

/// Transport seam.
///
/// Implementations must preserve per-connection ordering of both inbound
/// events and outbound frames.
pub trait BusClient: Send + Sync {
    /// Register `component` and start receiving its events.
    fn connect(&self, component: &BusComponent) -> Result<BusSubscription, BusError>;

    /// Drop the registration. Pending inbound events are discarded.
    fn disconnect(&self) -> Result<(), BusError>;

    /// Emit one outbound frame.
    fn send(&self, frame: OutboundFrame) -> Result<(), BusError>;

    /// Whether a component is currently registered.
    fn is_connected(&self) -> bool;
}
