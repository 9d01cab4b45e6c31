//! Topic-based event bus for battle events.
//!
//! Every [`battle_core::BattleEvent`] the engine reports is published to one
//! topic, so a combat log and a progression tracker can subscribe
//! independently.

mod bus;

pub use bus::{Event, EventBus, Topic};
