//! Event Bus Adapter for the RC component
//!
//! Connects the endpoint to a [`BusClient`] and drives it from one task.
//! Bus events, local commands and the delayed settings notification are
//! multiplexed in a single loop, so the endpoint never sees two events at
//! once.

use std::future::pending;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use hmi_bus::{BusClient, BusError, BusEvent, BusSubscription};
use tokio::sync::mpsc;
use tokio::time::{sleep, Sleep};
use tracing::{debug, info, warn};

use crate::config::{ConfigError, RcConfig};
use crate::events::{RcCommand, RcHandle};
use crate::handler::RcEndpoint;
use crate::metrics::MetricsRecorder;
use crate::ports::{RcPorts, RpcObserver};

/// Bus adapter for the RC component
pub struct RcBusAdapter<B>
where
    B: BusClient + 'static,
{
    client: Arc<B>,
    endpoint: RcEndpoint,
    commands: mpsc::UnboundedReceiver<RcCommand>,
    handle: RcHandle,
    settings_delay: Duration,
    /// Pending `OnRemoteControlSettings` after registration.
    settings_timer: Option<Pin<Box<Sleep>>>,
}

impl<B> RcBusAdapter<B>
where
    B: BusClient + 'static,
{
    pub fn new(
        config: RcConfig,
        ports: RcPorts,
        client: Arc<B>,
        metrics: Arc<dyn MetricsRecorder>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let (handle, commands) = RcHandle::channel();
        let endpoint = RcEndpoint::new(
            &config,
            ports,
            client.clone() as Arc<dyn BusClient>,
            metrics,
            handle.clone(),
        );
        Ok(Self {
            client,
            endpoint,
            commands,
            handle,
            settings_delay: config.settings_notification_delay(),
            settings_timer: None,
        })
    }

    /// Handle for local subsystems. Stays valid until `run` returns.
    pub fn handle(&self) -> RcHandle {
        self.handle.clone()
    }

    pub fn endpoint(&self) -> &RcEndpoint {
        &self.endpoint
    }

    /// Register the component on the bus.
    pub fn connect(&self) -> Result<BusSubscription, BusError> {
        let component = self.endpoint.component();
        info!(
            component = %component.name,
            component_id = component.id,
            "Connecting RC component"
        );
        self.client.connect(component)
    }

    /// Run the unregistered hook, then close the client.
    pub fn disconnect(&mut self) -> Result<(), BusError> {
        self.settings_timer = None;
        self.endpoint.on_unregistered();
        self.client.disconnect()
    }

    /// Connect and process events until the connection closes or a
    /// disconnect is requested.
    pub async fn run(mut self) -> Result<(), BusError> {
        let mut subscription = self.connect()?;

        loop {
            tokio::select! {
                // Frames already queued are answered before a disconnect.
                biased;

                event = subscription.recv() => match event {
                    Some(event) => self.handle_event(event),
                    None => {
                        info!("Bus event stream closed");
                        break;
                    }
                },
                Some(command) = self.commands.recv() => {
                    if !self.endpoint.handle_command(command) {
                        if let Err(e) = self.disconnect() {
                            warn!(error = %e, "Disconnect failed");
                        }
                        break;
                    }
                }
                _ = wait_for(&mut self.settings_timer) => {
                    self.settings_timer = None;
                    self.endpoint.notify_remote_control_settings();
                }
            }
        }

        info!("RC bus adapter stopped");
        Ok(())
    }

    fn handle_event(&mut self, event: BusEvent) {
        match event {
            BusEvent::Registered => {
                self.endpoint.on_registered();
                debug!(
                    delay_ms = self.settings_delay.as_millis() as u64,
                    "Settings notification scheduled"
                );
                self.settings_timer = Some(Box::pin(sleep(self.settings_delay)));
            }
            BusEvent::Unregistered => {
                self.settings_timer = None;
                self.endpoint.on_unregistered();
            }
            BusEvent::Disconnected => {
                self.settings_timer = None;
                self.endpoint.on_disconnected();
            }
            BusEvent::Frame(frame) => self.endpoint.handle_frame(frame),
        }
    }
}

/// Completes when the timer fires; never completes without one.
async fn wait_for(timer: &mut Option<Pin<Box<Sleep>>>) {
    match timer {
        Some(timer) => timer.as_mut().await,
        None => pending().await,
    }
}
