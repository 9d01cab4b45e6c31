//! What the engine reports back after each call.

use crate::attack::AttackDefinition;
use crate::combat::{AttackOutcome, ResolutionResult};
use crate::progression::UpgradeDefinition;
use crate::state::{ArchetypeId, BattleState, CombatantId, Phase, RunStats, Side, StatusEffectKind};

/// Why a combatant did not act.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkipReason {
    Stunned,
    NoReadyAttack,
}

/// Ordered, presentation-friendly record of everything that happened.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleEvent {
    WaveStarted {
        wave: u32,
        enemies: Vec<(CombatantId, ArchetypeId)>,
        enemy_health: f32,
    },
    AttackUsed {
        attacker: CombatantId,
        attack: String,
        sound_cue: Option<String>,
        targets: Vec<CombatantId>,
        outcome: AttackOutcome,
    },
    Damaged {
        target: CombatantId,
        amount: f32,
        absorbed: f32,
        is_crit: bool,
    },
    Healed {
        target: CombatantId,
        amount: f32,
    },
    Recoil {
        attacker: CombatantId,
        amount: f32,
    },
    SelfKnockout {
        attacker: CombatantId,
    },
    StatusApplied {
        target: CombatantId,
        kind: StatusEffectKind,
        duration: u32,
    },
    StatusTicked {
        target: CombatantId,
        damage: f32,
        healing: f32,
    },
    StatusExpired {
        target: CombatantId,
        kind: StatusEffectKind,
    },
    TurnSkipped {
        combatant: CombatantId,
        reason: SkipReason,
    },
    Defeated {
        combatant: CombatantId,
    },
    WaveCleared {
        wave: u32,
    },
    UpgradesOffered {
        ids: Vec<String>,
    },
    UpgradeChosen {
        id: String,
    },
    UpgradeSkipped,
    AttackUnlocked {
        attack: String,
    },
    Victory {
        stats: RunStats,
    },
    Defeat {
        stats: RunStats,
    },
}

impl BattleEvent {
    /// Events describing one resolution, in the order they happened.
    pub fn from_resolution(result: &ResolutionResult, targets: &[CombatantId]) -> Vec<Self> {
        let mut events = vec![Self::AttackUsed {
            attacker: result.attacker,
            attack: result.attack.clone(),
            sound_cue: result.sound_cue.clone(),
            targets: targets.to_vec(),
            outcome: result.outcome,
        }];

        if result.self_ko {
            events.push(Self::SelfKnockout {
                attacker: result.attacker,
            });
            events.push(Self::Defeated {
                combatant: result.attacker,
            });
            return events;
        }

        for target in &result.per_target {
            if target.healed > 0.0 {
                events.push(Self::Healed {
                    target: target.target,
                    amount: target.healed,
                });
            }
            if target.damage > 0.0 || target.absorbed > 0.0 {
                events.push(Self::Damaged {
                    target: target.target,
                    amount: target.damage,
                    absorbed: target.absorbed,
                    is_crit: target.is_crit,
                });
            }
        }
        if result.self_damage > 0.0 {
            events.push(Self::Recoil {
                attacker: result.attacker,
                amount: result.self_damage,
            });
        }
        if result.lifesteal_heal > 0.0 {
            events.push(Self::Healed {
                target: result.attacker,
                amount: result.lifesteal_heal,
            });
        }
        for applied in &result.status_applied {
            events.push(Self::StatusApplied {
                target: applied.target,
                kind: applied.kind,
                duration: applied.duration,
            });
        }
        for killed in result.kills() {
            events.push(Self::Defeated { combatant: killed });
        }
        if result.attacker_died {
            events.push(Self::Defeated {
                combatant: result.attacker,
            });
        }
        events
    }
}

/// What the player's submitted action turned into.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayerAction {
    Resolved(ResolutionResult),
    /// The player was stunned; the action was consumed without effect.
    Stunned { attack: String },
    /// Nothing was ready, so the player let the round pass.
    Passed { reason: SkipReason },
}

/// What one enemy did on its turn.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EnemyAction {
    Attacked(ResolutionResult),
    Skipped {
        enemy: CombatantId,
        reason: SkipReason,
    },
}

impl EnemyAction {
    pub fn enemy(&self) -> CombatantId {
        match self {
            Self::Attacked(result) => result.attacker,
            Self::Skipped { enemy, .. } => *enemy,
        }
    }
}

/// Result of one engine call.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnReport {
    pub player_action: Option<PlayerAction>,
    pub enemy_actions: Vec<EnemyAction>,
    pub events: Vec<BattleEvent>,
    /// Phase after the call.
    pub phase: Phase,
    /// Offers generated by this call, if it ended a wave.
    pub offers: Vec<UpgradeDefinition>,
    /// Final stats, present once the run is over.
    pub stats: Option<RunStats>,
}

impl TurnReport {
    pub fn new(phase: Phase) -> Self {
        Self {
            player_action: None,
            enemy_actions: Vec::new(),
            events: Vec::new(),
            phase,
            offers: Vec::new(),
            stats: None,
        }
    }

    /// Appends a later report; its phase and final stats win.
    pub fn merge(&mut self, later: TurnReport) {
        if later.player_action.is_some() {
            self.player_action = later.player_action;
        }
        self.enemy_actions.extend(later.enemy_actions);
        self.events.extend(later.events);
        if !later.offers.is_empty() {
            self.offers = later.offers;
        }
        self.phase = later.phase;
        if later.stats.is_some() {
            self.stats = later.stats;
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_over()
    }
}

/// An unlocked attack with its remaining cooldown.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AvailableAttack {
    pub attack: AttackDefinition,
    pub cooldown_remaining: u32,
}

impl AvailableAttack {
    pub fn is_ready(&self) -> bool {
        self.cooldown_remaining == 0
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyView {
    pub id: CombatantId,
    pub archetype: ArchetypeId,
    pub health: f32,
    pub max_health: f32,
    pub shield: f32,
    pub alive: bool,
}

/// Host-facing summary of the battle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleStateView {
    pub player_health: f32,
    pub player_max_health: f32,
    pub player_shield: f32,
    pub enemies: Vec<EnemyView>,
    pub wave: u32,
    pub phase: Phase,
    pub is_over: bool,
    pub winner: Option<Side>,
}

impl BattleStateView {
    pub fn enemy_healths(&self) -> Vec<f32> {
        self.enemies.iter().map(|e| e.health).collect()
    }
}

impl From<&BattleState> for BattleStateView {
    fn from(state: &BattleState) -> Self {
        Self {
            player_health: state.player.current_health,
            player_max_health: state.player.max_health,
            player_shield: state.player.shield,
            enemies: state
                .enemies
                .iter()
                .map(|e| EnemyView {
                    id: e.id,
                    archetype: e.archetype.clone(),
                    health: e.current_health,
                    max_health: e.max_health,
                    shield: e.shield,
                    alive: e.is_alive(),
                })
                .collect(),
            wave: state.wave.number,
            phase: state.phase,
            is_over: state.phase.is_over(),
            winner: state.phase.winner(),
        }
    }
}
