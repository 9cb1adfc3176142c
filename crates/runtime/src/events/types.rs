//! Payloads published by device workers.

use serde::{Deserialize, Serialize};

use bureau_core::{
    ChangeSet, CompletedJob, ErrorSeverity, Item, OperationKind, SoundCue, StatusView,
};

use crate::api::DeviceId;

/// Device lifecycle events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DeviceEvent {
    /// Something observable changed (or a redraw was explicitly requested);
    /// hosts should re-render from `status`.
    RenderRequired {
        device: DeviceId,
        status: StatusView,
        changes: ChangeSet,
    },

    /// The production timer fired and the job was committed.
    ProductionCompleted { device: DeviceId, job: CompletedJob },

    /// A request was refused.
    OperationRejected {
        device: DeviceId,
        operation: OperationKind,
        code: String,
        severity: ErrorSeverity,
        message: String,
    },
}

/// Things the device pushes into the surrounding world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputEvent {
    ItemSpawned { device: DeviceId, item: Item },
    Sound { device: DeviceId, cue: SoundCue },
}

impl DeviceEvent {
    pub fn device(&self) -> DeviceId {
        match self {
            DeviceEvent::RenderRequired { device, .. }
            | DeviceEvent::ProductionCompleted { device, .. }
            | DeviceEvent::OperationRejected { device, .. } => *device,
        }
    }
}

impl OutputEvent {
    pub fn device(&self) -> DeviceId {
        match self {
            OutputEvent::ItemSpawned { device, .. } | OutputEvent::Sound { device, .. } => *device,
        }
    }
}
