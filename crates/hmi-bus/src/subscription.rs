//! # Bus Subscription
//!
//! Receiving side of a connection.

use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::client::{BusError, BusEvent};

/// Handle for receiving the events of one connection.
///
/// Yields `None` once the client disconnects.
pub struct BusSubscription {
    receiver: mpsc::UnboundedReceiver<BusEvent>,
}

impl BusSubscription {
    pub fn new(receiver: mpsc::UnboundedReceiver<BusEvent>) -> Self {
        Self { receiver }
    }

    /// Wait for the next event.
    pub async fn recv(&mut self) -> Option<BusEvent> {
        self.receiver.recv().await
    }

    /// Receive the next event without waiting.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(event))` - An event was available
    /// - `Ok(None)` - Nothing queued right now
    /// - `Err(BusError::Closed)` - The connection is gone
    pub fn try_recv(&mut self) -> Result<Option<BusEvent>, BusError> {
        match self.receiver.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::error::TryRecvError::Empty) => Ok(None),
            Err(mpsc::error::TryRecvError::Disconnected) => Err(BusError::Closed),
        }
    }

    /// Convert into a `Stream` of events.
    pub fn into_stream(self) -> UnboundedReceiverStream<BusEvent> {
        UnboundedReceiverStream::new(self.receiver)
    }
}
