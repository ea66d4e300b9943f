//! # HMI Bus - Component Transport
//!
//! Connects one named component (e.g. `RC`) to the head-unit middleware bus.
//!
//! ## Model
//!
//! ```text
//! ┌──────────────┐   connect()    ┌──────────────┐
//! │  Component   │ ─────────────▶ │   BusClient  │
//! │              │ ◀───────────── │              │
//! │              │  BusEvent      │              │
//! │              │ ─────────────▶ │              │
//! └──────────────┘   send()       └──────────────┘
//! ```
//!
//! - `connect` hands back a [`BusSubscription`] yielding lifecycle events and
//!   decoded inbound frames, in arrival order.
//! - `send` emits one outbound frame. Sending on a disconnected client fails
//!   with [`BusError::NotConnected`].

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod client;
pub mod in_memory;
pub mod subscription;

pub use client::{BusClient, BusError, BusEvent};
pub use in_memory::InMemoryBus;
pub use subscription::BusSubscription;

/// Outbound frames buffered per observer before it starts lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

/// Most recent outbound frames an [`InMemoryBus`] keeps for inspection.
pub const DEFAULT_SENT_HISTORY: usize = 1000;
