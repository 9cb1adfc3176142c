//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{DeviceEvent, OutputEvent};
use crate::api::DeviceId;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Render requests, job completions and rejections
    Device,
    /// Spawned items and sound cues
    Output,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    Device(DeviceEvent),
    Output(OutputEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Device(_) => Topic::Device,
            Event::Output(_) => Topic::Output,
        }
    }

    pub fn device(&self) -> DeviceId {
        match self {
            Event::Device(event) => event.device(),
            Event::Output(event) => event.device(),
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Channels for every topic exist from construction,
/// so publishing and subscribing never block.
#[derive(Clone)]
pub struct EventBus {
    device: broadcast::Sender<Event>,
    output: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            device: broadcast::channel(capacity).0,
            output: broadcast::channel(capacity).0,
        }
    }

    fn channel(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Device => &self.device,
            Topic::Output => &self.output,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.channel(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channel(topic).subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bureau_core::SoundCue;

    #[test]
    fn events_route_by_topic() {
        let bus = EventBus::with_capacity(4);
        let mut device_rx = bus.subscribe(Topic::Device);
        let mut output_rx = bus.subscribe(Topic::Output);

        bus.publish(Event::Output(OutputEvent::Sound {
            device: DeviceId(3),
            cue: SoundCue::Copier,
        }));

        let event = output_rx.try_recv().unwrap();
        assert_eq!(event.topic(), Topic::Output);
        assert_eq!(event.device(), DeviceId(3));
        assert!(device_rx.try_recv().is_err());
    }

    #[test]
    fn publish_without_subscribers_is_silent() {
        let bus = EventBus::new();
        bus.publish(Event::Output(OutputEvent::Sound {
            device: DeviceId(0),
            cue: SoundCue::Copier,
        }));
    }
}
