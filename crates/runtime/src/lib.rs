//! Async host for bureau appliances.
//!
//! Each photocopier runs inside its own worker task that owns the
//! authoritative [`bureau_core::ApplianceController`]. Clients talk to it
//! through a cloneable [`DeviceHandle`] and observe it through the
//! topic-based [`EventBus`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the event bus and event payloads
//! - [`messages`] handles admin network messages
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod messages;
pub mod runtime;

mod workers;

pub use api::{DeviceHandle, DeviceId, Result, RuntimeError};
pub use events::{DeviceEvent, Event, EventBus, OutputEvent, Topic};
pub use messages::{
    ChangeVariableRequest, ListModification, MessageError, MessageSender, VariableEditor,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
