//! Worker tasks that back the runtime orchestration.
//!
//! One device worker runs per hosted photocopier and owns its controller.

mod device;

pub use device::{Command, DeviceWorker};
