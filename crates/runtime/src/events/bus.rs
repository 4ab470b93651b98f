//! Topic-based event bus implementation.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use game_core::{GameEvent, Tick};

use super::types::{ClockEvent, LifecycleEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Presentation events emitted by the simulation (combat, magic, level-ups)
    Game,
    /// Tick gate changes
    Clock,
    /// Level generation, death and reset
    Lifecycle,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Game, Topic::Clock, Topic::Lifecycle];
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Game { tick: Tick, event: GameEvent },
    Clock(ClockEvent),
    Lifecycle(LifecycleEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Game { .. } => Topic::Game,
            Event::Clock(_) => Topic::Clock,
            Event::Lifecycle(_) => Topic::Lifecycle,
        }
    }
}

struct Channels {
    game: broadcast::Sender<Event>,
    clock: broadcast::Sender<Event>,
    lifecycle: broadcast::Sender<Event>,
}

impl Channels {
    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Game => &self.game,
            Topic::Clock => &self.clock,
            Topic::Lifecycle => &self.lifecycle,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Every topic channel exists from construction on,
/// so subscribing never fails.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<Channels>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(Channels {
                game: broadcast::channel(capacity).0,
                clock: broadcast::channel(capacity).0,
                lifecycle: broadcast::channel(capacity).0,
            }),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.channels.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
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

    #[tokio::test]
    async fn events_reach_only_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut clock = bus.subscribe(Topic::Clock);
        let mut lifecycle = bus.subscribe(Topic::Lifecycle);

        bus.publish(Event::Clock(ClockEvent::TickReady { tick: Tick(3) }));
        assert_eq!(
            clock.recv().await.unwrap(),
            Event::Clock(ClockEvent::TickReady { tick: Tick(3) })
        );
        assert!(lifecycle.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::default();
        bus.publish(Event::Lifecycle(LifecycleEvent::Reset));
        assert_eq!(bus.subscribe_multiple(&Topic::ALL).len(), 3);
    }
}
