//! Event types and the topic-based bus used by runtime workers.
mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{DeviceEvent, OutputEvent};
