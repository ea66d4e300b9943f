//! Assembles the RC component on an in-memory bus and runs it.

use std::sync::Arc;

use hmi_bus::{BusClient, BusError, InMemoryBus};
use hmi_types::OutboundFrame;
use rc_remote_control::adapters::{
    AccessModeConsentResolver, InMemoryApplicationRegistry, InMemorySettings,
    ReferenceClimateModel, ReferenceRadioModel,
};
use rc_remote_control::{
    ConfigError, DeviceInfo, MetricsSnapshot, RcBusAdapter, RcHandle, RcPorts,
};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::RuntimeConfig;
use crate::metrics::RuntimeMetrics;

/// Runtime errors
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Bus error: {0}")]
    Bus(#[from] BusError),

    #[error("RC task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// A running RC component.
pub struct RcRuntime {
    bus: Arc<InMemoryBus>,
    handle: RcHandle,
    settings: Arc<InMemorySettings>,
    metrics: Arc<RuntimeMetrics>,
    task: JoinHandle<Result<(), BusError>>,
}

impl RcRuntime {
    /// Build the reference subsystems, spawn the bus adapter and wait for
    /// the component to register.
    pub async fn start(config: &RuntimeConfig) -> Result<Self, RuntimeError> {
        // Outbound frames are only observed through `subscribe_outbound`.
        let bus = Arc::new(InMemoryBus::new().with_history(0));

        let registry = Arc::new(InMemoryApplicationRegistry::new());
        for app in &config.applications {
            registry.register(app.app_id, app.app_name.clone(), app.device_name.clone());
        }

        let settings = Arc::new(InMemorySettings::new());
        settings.set_driver_device(config.driver_device.clone().map(DeviceInfo::new));
        settings.set_reverse_functionality_enabled(config.reverse_enabled);
        settings.set_reverse_access_mode(config.access_mode);

        let ports = RcPorts {
            climate: Arc::new(ReferenceClimateModel::new()),
            radio: Arc::new(ReferenceRadioModel::new()),
            registry,
            settings: settings.clone(),
            consent: Arc::new(AccessModeConsentResolver::new(settings.clone())),
        };

        let metrics = Arc::new(RuntimeMetrics::new());
        let adapter = RcBusAdapter::new(config.rc.clone(), ports, bus.clone(), metrics.clone())?;
        let handle = adapter.handle();
        let task = tokio::spawn(adapter.run());

        while !bus.is_connected() && !task.is_finished() {
            tokio::task::yield_now().await;
        }

        info!(
            applications = config.applications.len(),
            access_mode = ?config.access_mode,
            "RC runtime started"
        );

        Ok(Self {
            bus,
            handle,
            settings,
            metrics,
            task,
        })
    }

    pub fn bus(&self) -> &Arc<InMemoryBus> {
        &self.bus
    }

    pub fn handle(&self) -> RcHandle {
        self.handle.clone()
    }

    pub fn settings(&self) -> &Arc<InMemorySettings> {
        &self.settings
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Deliver one line of NDJSON input. Blank lines are skipped.
    pub fn feed_line(&self, line: &str) -> Result<(), BusError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }
        self.bus.inject_json(line)
    }

    /// Ask the adapter to disconnect and wait for it to stop.
    pub async fn shutdown(self) -> Result<MetricsSnapshot, RuntimeError> {
        if !self.handle.disconnect() {
            warn!("RC adapter already stopped");
        }
        self.task.await??;
        Ok(self.metrics.snapshot())
    }
}

/// Write every outbound frame to `sink` until the bus goes away.
pub async fn forward_outbound<F>(mut frames: broadcast::Receiver<OutboundFrame>, mut sink: F)
where
    F: FnMut(&OutboundFrame),
{
    loop {
        match frames.recv().await {
            Ok(frame) => sink(&frame),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "Outbound printer lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
