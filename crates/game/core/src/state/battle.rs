use std::collections::VecDeque;

use super::{Combatant, CombatantId, Side};
use crate::ai::{AttackSummary, BattleSnapshot, CombatantSnapshot};
use crate::attack::AttackDefinition;
use crate::config::BattleConfig;
use crate::env::AttackOracle;
use crate::progression::{Loadout, UpgradeDefinition, UpgradeLedger, WaveState};

/// Where the battle state machine currently rests between calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    AwaitingPlayerChoice,
    EnemyTurn,
    ChoosingUpgrade,
    Victory,
    Defeat,
}

impl Phase {
    pub const fn is_over(self) -> bool {
        matches!(self, Self::Victory | Self::Defeat)
    }

    pub const fn winner(self) -> Option<Side> {
        match self {
            Self::Victory => Some(Side::Player),
            Self::Defeat => Some(Side::Enemy),
            _ => None,
        }
    }
}

/// Totals collected over a run, reported when it ends.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunStats {
    pub waves_cleared: u32,
    pub enemies_defeated: u32,
    /// Player turns taken.
    pub rounds: u32,
    pub damage_dealt: f32,
    /// Health the player lost, recoil and damage over time included.
    pub damage_taken: f32,
    pub healing_done: f32,
    pub critical_hits: u32,
    pub upgrades_taken: Vec<String>,
}

/// Complete state of one battle run.
///
/// Mutated only through [`BattleEngine`](crate::engine::BattleEngine).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleState {
    pub config: BattleConfig,
    pub phase: Phase,
    pub player: Combatant,
    /// Enemies of the current wave in spawn order; the dead stay in place.
    pub enemies: Vec<Combatant>,
    pub wave: WaveState,
    pub loadout: Loadout,
    pub ledger: UpgradeLedger,
    /// Upgrades on offer while in [`Phase::ChoosingUpgrade`].
    pub offers: Vec<UpgradeDefinition>,
    pub stats: RunStats,
    pub(crate) next_enemy_id: u32,
    pub(crate) enemy_queue: VecDeque<CombatantId>,
}

impl BattleState {
    pub fn enemy(&self, id: CombatantId) -> Option<&Combatant> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        if id.is_player() {
            Some(&self.player)
        } else {
            self.enemy(id)
        }
    }

    pub fn alive_enemies(&self) -> impl Iterator<Item = &Combatant> {
        self.enemies.iter().filter(|e| e.is_alive())
    }

    pub fn all_enemies_dead(&self) -> bool {
        self.enemies.iter().all(|e| !e.is_alive())
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_over()
    }

    /// Enemies still to act this enemy turn, in order.
    pub fn enemy_queue(&self) -> Vec<CombatantId> {
        self.enemy_queue.iter().copied().collect()
    }

    /// Attacks of a combatant that are unlocked and off cooldown, in catalog order.
    pub fn ready_attacks<'e>(
        &self,
        attacks: &'e dyn AttackOracle,
        id: CombatantId,
    ) -> Vec<&'e AttackDefinition> {
        let Some(combatant) = self.combatant(id) else {
            return Vec::new();
        };
        let moveset = attacks.attacks_for(&combatant.archetype);
        let ready = |attack: &&AttackDefinition| combatant.cooldowns.is_ready(&attack.name);

        if id.is_player() {
            self.loadout.attacks(moveset).filter(ready).collect()
        } else {
            moveset.iter().filter(ready).collect()
        }
    }

    /// Snapshot handed to enemy strategies for `acting`'s decision.
    pub fn snapshot(&self, acting: CombatantId, ready: &[&AttackDefinition]) -> BattleSnapshot {
        BattleSnapshot {
            wave: self.wave.number,
            round: self.stats.rounds,
            acting,
            player: CombatantSnapshot::from(&self.player),
            enemies: self.alive_enemies().map(CombatantSnapshot::from).collect(),
            ready_attacks: ready.iter().map(|a| AttackSummary::from(*a)).collect(),
        }
    }
}
