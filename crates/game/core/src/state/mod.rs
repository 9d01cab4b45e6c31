//! Mutable battle state: combatants and what hangs off them.
//!
//! Everything here is owned by [`BattleState`] and changed only through
//! [`BattleEngine`](crate::engine::BattleEngine); the resolver only ever
//! borrows combatants for the duration of one call.

mod battle;
mod combatant;
mod cooldown;
mod status;

pub use battle::{BattleState, Phase, RunStats};
pub use combatant::{ArchetypeId, Combatant, CombatantId, DamageTaken, Side};
pub use cooldown::Cooldowns;
pub use status::{ActiveStatus, StatusEffectKind, StatusEffects, StatusTick};
