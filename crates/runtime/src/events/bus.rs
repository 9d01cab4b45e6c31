//! Topic-based event bus implementation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use battle_core::BattleEvent;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Attacks, damage, statuses and skipped turns
    Combat,
    /// Waves, upgrades, unlocks and the end of the run
    Progression,
}

/// Event wrapper that carries the topic and the engine event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Combat(BattleEvent),
    Progression(BattleEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Combat(_) => Topic::Combat,
            Event::Progression(_) => Topic::Progression,
        }
    }

    pub fn battle_event(&self) -> &BattleEvent {
        match self {
            Event::Combat(event) | Event::Progression(event) => event,
        }
    }
}

impl From<BattleEvent> for Event {
    fn from(event: BattleEvent) -> Self {
        match event {
            BattleEvent::WaveStarted { .. }
            | BattleEvent::WaveCleared { .. }
            | BattleEvent::UpgradesOffered { .. }
            | BattleEvent::UpgradeChosen { .. }
            | BattleEvent::UpgradeSkipped
            | BattleEvent::AttackUnlocked { .. }
            | BattleEvent::Victory { .. }
            | BattleEvent::Defeat { .. } => Event::Progression(event),
            _ => Event::Combat(event),
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing is best-effort: events sent while
/// nobody listens are dropped.
#[derive(Debug, Clone)]
pub struct EventBus {
    combat: broadcast::Sender<Event>,
    progression: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            combat: broadcast::channel(capacity).0,
            progression: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Combat => &self.combat,
            Topic::Progression => &self.progression,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
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
