//! Deterministic battle rules shared by every host.
//!
//! `battle-core` defines the canonical combat rules (attack resolution,
//! turn order, wave progression, upgrades) and exposes pure APIs that the
//! runtime, content loaders and tests reuse. All state mutation flows through
//! [`engine::BattleEngine`]; every random decision is drawn from a
//! [`env::RollSource`], so a battle replays exactly from its seed.
pub mod ai;
pub mod attack;
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod progression;
pub mod state;
pub mod stats;

pub use ai::{BattleSnapshot, EnemyStrategy, HighestDamageStrategy, ready_by_name};
pub use attack::{
    ALL_TARGETS, AttackDataError, AttackDefinition, AttackKind, HealTarget, StatusEffectSpec,
};
pub use combat::{AttackOutcome, CombatParams, ResolutionResult, TargetOutcome, resolve_attack};
pub use config::{BattleConfig, WaveConfig};
pub use engine::{
    AvailableAttack, BattleEngine, BattleError, BattleEvent, BattleStateView, EnemyAction,
    PlayerAction, SkipReason, TurnReport, start_battle,
};
pub use env::{
    AttackOracle, BattleEnv, CatalogError, RngOracle, RollPurpose, RollSource, ScriptedRolls,
    SeededRolls, StaticCatalog, UpgradeOracle,
};
pub use error::{ErrorSeverity, GameError};
pub use progression::{
    AttackUnlock, Loadout, Rarity, RarityWeights, UnlockMode, UpgradeDefinition, UpgradeEffect,
    UpgradeLedger,
};
pub use state::{
    ArchetypeId, BattleState, Combatant, CombatantId, Phase, RunStats, Side, StatusEffectKind,
};
pub use stats::{CombatModifiers, ModifierStat};
