//! Handler Layer
//!
//! Request validation and dispatch, reply encoding and notification
//! emission.

pub mod dispatcher;
pub mod notifier;
pub mod reply;

pub use dispatcher::RcEndpoint;
pub use notifier::NotificationEmitter;
pub use reply::ReplySender;
