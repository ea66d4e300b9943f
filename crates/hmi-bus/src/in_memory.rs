//! # In-Memory Bus
//!
//! Single-connection bus used by the runtime binary and by tests. The peer
//! side (the middleware) is driven through `inject*`, `unregister` and
//! `drop_connection`; outbound frames are broadcast to observers and the
//! most recent ones are kept for inspection.

use hmi_types::{BusComponent, InboundFrame, OutboundFrame};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use crate::client::{BusClient, BusError, BusEvent};
use crate::subscription::BusSubscription;
use crate::{DEFAULT_CHANNEL_CAPACITY, DEFAULT_SENT_HISTORY};

struct Connection {
    component: BusComponent,
    events: mpsc::UnboundedSender<BusEvent>,
}

/// In-memory implementation of [`BusClient`].
pub struct InMemoryBus {
    /// Currently registered component, if any.
    connection: RwLock<Option<Connection>>,

    /// Fan-out of outbound frames to observers.
    outbound: broadcast::Sender<OutboundFrame>,

    /// Most recent frames sent, oldest first.
    sent: RwLock<VecDeque<OutboundFrame>>,

    /// Upper bound on `sent`. Zero disables recording.
    history: usize,

    /// Total frames sent.
    frames_sent: AtomicU64,
}

impl InMemoryBus {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (outbound, _) = broadcast::channel(capacity);
        Self {
            connection: RwLock::new(None),
            outbound,
            sent: RwLock::new(VecDeque::new()),
            history: DEFAULT_SENT_HISTORY,
            frames_sent: AtomicU64::new(0),
        }
    }

    /// Keep at most `limit` sent frames; `0` records nothing.
    #[must_use]
    pub fn with_history(mut self, limit: usize) -> Self {
        self.history = limit;
        self
    }

    /// Observe outbound frames as they are sent.
    #[must_use]
    pub fn subscribe_outbound(&self) -> broadcast::Receiver<OutboundFrame> {
        self.outbound.subscribe()
    }

    /// Name and id of the registered component.
    pub fn connected_component(&self) -> Option<BusComponent> {
        self.connection
            .read()
            .ok()
            .and_then(|c| c.as_ref().map(|c| c.component.clone()))
    }

    /// Deliver an inbound frame to the registered component.
    pub fn inject(&self, frame: InboundFrame) -> Result<(), BusError> {
        self.deliver(BusEvent::Frame(frame))
    }

    /// Decode `text` and deliver it.
    pub fn inject_json(&self, text: &str) -> Result<(), BusError> {
        let frame = InboundFrame::parse(text)?;
        self.inject(frame)
    }

    /// Peer withdraws the component's registration. The connection stays up.
    pub fn unregister(&self) -> Result<(), BusError> {
        self.deliver(BusEvent::Unregistered)
    }

    /// Simulate losing the connection.
    pub fn drop_connection(&self) -> Result<(), BusError> {
        let connection = self
            .connection
            .write()
            .map_err(|_| BusError::Closed)?
            .take()
            .ok_or(BusError::NotConnected)?;

        warn!(component = %connection.component.name, "Bus connection dropped");
        connection
            .events
            .send(BusEvent::Disconnected)
            .map_err(|_| BusError::Closed)
    }

    /// Snapshot of the recorded frames, oldest first.
    pub fn sent_frames(&self) -> Vec<OutboundFrame> {
        self.sent
            .read()
            .map(|s| s.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Forget recorded frames.
    pub fn clear_sent(&self) {
        if let Ok(mut sent) = self.sent.write() {
            sent.clear();
        }
    }

    /// Total frames sent since creation.
    pub fn frames_sent(&self) -> u64 {
        self.frames_sent.load(Ordering::Relaxed)
    }

    fn deliver(&self, event: BusEvent) -> Result<(), BusError> {
        let guard = self.connection.read().map_err(|_| BusError::Closed)?;
        let connection = guard.as_ref().ok_or(BusError::NotConnected)?;
        connection.events.send(event).map_err(|_| BusError::Closed)
    }
}

impl Default for InMemoryBus {
    fn default() -> Self {
        Self::new()
    }
}

impl BusClient for InMemoryBus {
    fn connect(&self, component: &BusComponent) -> Result<BusSubscription, BusError> {
        let mut guard = self.connection.write().map_err(|_| BusError::Closed)?;
        if let Some(existing) = guard.as_ref() {
            return Err(BusError::AlreadyConnected(existing.component.name.clone()));
        }

        let (events, receiver) = mpsc::unbounded_channel();
        events
            .send(BusEvent::Registered)
            .map_err(|_| BusError::Closed)?;

        info!(
            component = %component.name,
            component_id = component.id,
            "Component registered on bus"
        );

        *guard = Some(Connection {
            component: component.clone(),
            events,
        });
        Ok(BusSubscription::new(receiver))
    }

    fn disconnect(&self) -> Result<(), BusError> {
        let connection = self
            .connection
            .write()
            .map_err(|_| BusError::Closed)?
            .take()
            .ok_or(BusError::NotConnected)?;

        info!(component = %connection.component.name, "Component disconnected from bus");
        Ok(())
    }

    fn send(&self, frame: OutboundFrame) -> Result<(), BusError> {
        if !self.is_connected() {
            return Err(BusError::NotConnected);
        }

        self.frames_sent.fetch_add(1, Ordering::Relaxed);
        if self.history > 0 {
            if let Ok(mut sent) = self.sent.write() {
                if sent.len() == self.history {
                    sent.pop_front();
                }
                sent.push_back(frame.clone());
            }
        }

        let method = frame.method().unwrap_or_default().to_string();
        match self.outbound.send(frame) {
            Ok(receivers) => debug!(method = %method, receivers, "Frame sent"),
            Err(_) => debug!(method = %method, "Frame sent (no observers)"),
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connection
            .read()
            .map(|c| c.is_some())
            .unwrap_or(false)
    }
}
