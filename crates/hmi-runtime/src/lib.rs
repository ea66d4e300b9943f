//! # HMI Runtime
//!
//! Hosts the RC component on an in-memory bus with the reference climate,
//! radio, registry and settings subsystems. The binary reads inbound
//! JSON-RPC frames from stdin, one per line, and prints outbound frames to
//! stdout.

pub mod config;
pub mod metrics;
pub mod runtime;

pub use config::{ApplicationEntry, RuntimeConfig};
pub use metrics::RuntimeMetrics;
pub use runtime::{forward_outbound, RcRuntime, RuntimeError};
