//! Async runtime hosting one deterministic battle.
//!
//! This crate wires the pure rules of `battle-core` into a worker task that
//! owns the battle state, consults an optional advisory policy for enemy
//! attacks, and publishes every engine event on a topic bus. Hosts start a
//! battle with [`BattleRuntime::builder`] and play it through
//! [`BattleHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod runtime;

mod workers;

pub use api::{
    AdvisedEnemyStrategy, AdvisoryError, AdvisoryPolicy, BattleHandle, PresentationSink, Result,
    RuntimeError, TracingSink,
};
pub use events::{Event, EventBus, Topic};
pub use runtime::{BattleRuntime, BattleRuntimeBuilder, RuntimeConfig};
