//! High-level runtime orchestrator.
//!
//! The runtime owns one background worker per device, wires up the
//! command/event channels, and exposes a builder-based API for hosts.

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::info;

use bureau_core::PhotocopierConfig;

use crate::api::{DeviceHandle, DeviceId, Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::{Command, DeviceWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub photocopier: PhotocopierConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            photocopier: PhotocopierConfig::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
        }
    }
}

struct DeviceSlot {
    handle: DeviceHandle,
    worker: JoinHandle<()>,
}

/// Hosts a set of photocopiers, one worker task each.
///
/// [`DeviceHandle`]s are cloneable façades for clients. Workers stop once
/// every handle to them is dropped.
pub struct Runtime {
    config: RuntimeConfig,
    event_bus: EventBus,
    devices: Vec<DeviceSlot>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Spawn a worker for a fresh idle device and return its handle.
    ///
    /// Must be called from within a tokio runtime.
    pub fn add_device(&mut self) -> DeviceHandle {
        let id = DeviceId(self.devices.len() as u32);
        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let handle = DeviceHandle::new(id, command_tx, self.event_bus.clone());

        let worker = DeviceWorker::new(
            id,
            self.config.photocopier.clone(),
            command_rx,
            self.event_bus.clone(),
        );
        let worker = tokio::spawn(async move {
            worker.run().await;
        });

        info!(device = %id, "device spawned");
        self.devices.push(DeviceSlot {
            handle: handle.clone(),
            worker,
        });
        handle
    }

    /// Get a cloneable handle to a hosted device
    pub fn device(&self, id: DeviceId) -> Option<DeviceHandle> {
        self.devices
            .get(id.0 as usize)
            .map(|slot| slot.handle.clone())
    }

    pub fn device_ids(&self) -> impl Iterator<Item = DeviceId> + '_ {
        self.devices.iter().map(|slot| slot.handle.id())
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// Subscribe to events from every device on `topic`
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Shutdown the runtime gracefully
    ///
    /// Waits for each worker to finish, which happens once clients have
    /// dropped their handles too.
    pub async fn shutdown(self) -> Result<()> {
        for slot in self.devices {
            drop(slot.handle);
            slot.worker.await.map_err(RuntimeError::WorkerJoin)?;
        }
        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    devices: usize,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            devices: 1,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the photocopier configuration only
    pub fn photocopier(mut self, photocopier: PhotocopierConfig) -> Self {
        self.config.photocopier = photocopier;
        self
    }

    /// Number of devices spawned by [`build`](Self::build) (default: 1)
    pub fn devices(mut self, count: usize) -> Self {
        self.devices = count;
        self
    }

    /// Build the runtime and spawn its workers.
    ///
    /// Must be called from within a tokio runtime.
    pub fn build(self) -> Runtime {
        let mut runtime = Runtime {
            event_bus: EventBus::with_capacity(self.config.event_buffer_size),
            config: self.config,
            devices: Vec::with_capacity(self.devices),
        };
        for _ in 0..self.devices {
            runtime.add_device();
        }
        runtime
    }
}
