//! Turn orchestration for one battle run.
//!
//! The [`BattleEngine`] is the authoritative reducer for [`BattleState`]. A
//! round is: player attack, battle-end check (with the round tick), enemy
//! turns, battle-end check. Clearing a wave moves the run into the upgrade
//! choice, and the next wave spawns once an upgrade is picked or skipped.
//!
//! Every call validates first and only then mutates, so an `Err` always
//! leaves the state untouched.

mod errors;
mod report;
mod turns;


pub use errors::BattleError;
pub use report::{
    AvailableAttack, BattleEvent, BattleStateView, EnemyAction, EnemyView, PlayerAction,
    SkipReason, TurnReport,
};

use std::collections::VecDeque;

use crate::attack::select_targets;
use crate::combat::{CombatParams, Participants, ResolutionResult, resolve_attack};
use crate::config::BattleConfig;
use crate::env::{BattleEnv, RollSource};
use crate::progression::{
    Loadout, OfferContext, UpgradeLedger, WaveState, apply_upgrade, generate_offers, spawn_wave,
};
use crate::state::{ArchetypeId, BattleState, Combatant, CombatantId, Phase, RunStats};

/// Creates the state of a new run and spawns its first wave.
pub fn start_battle(
    env: BattleEnv<'_>,
    player_archetype: ArchetypeId,
    config: BattleConfig,
    rolls: &mut dyn RollSource,
) -> (BattleState, TurnReport) {
    let moveset = env.attacks().attacks_for(&player_archetype);
    let loadout = Loadout::for_mode(config.unlock_mode, moveset);
    let player = Combatant::player(player_archetype, config.player_max_health);

    let mut state = BattleState {
        config,
        phase: Phase::AwaitingPlayerChoice,
        player,
        enemies: Vec::new(),
        wave: WaveState {
            number: 0,
            enemy_health: 0.0,
            spawned: 0,
        },
        loadout,
        ledger: UpgradeLedger::new(),
        offers: Vec::new(),
        stats: RunStats::default(),
        next_enemy_id: 1,
        enemy_queue: VecDeque::new(),
    };

    let mut report = TurnReport::new(state.phase);
    BattleEngine::new(&mut state).spawn_next_wave(rolls, &mut report);
    report.phase = state.phase;
    (state, report)
}

/// Engine that drives a [`BattleState`] through its phases.
pub struct BattleEngine<'a> {
    state: &'a mut BattleState,
}

impl<'a> BattleEngine<'a> {
    pub fn new(state: &'a mut BattleState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &BattleState {
        self.state
    }

    pub fn view(&self) -> BattleStateView {
        BattleStateView::from(&*self.state)
    }

    /// Unlocked player attacks with their remaining cooldowns, in catalog order.
    pub fn available_attacks(&self, env: BattleEnv<'_>) -> Vec<AvailableAttack> {
        let moveset = env.attacks().attacks_for(&self.state.player.archetype);
        self.state
            .loadout
            .attacks(moveset)
            .map(|attack| AvailableAttack {
                attack: attack.clone(),
                cooldown_remaining: self.state.player.cooldowns.remaining(&attack.name),
            })
            .collect()
    }

    /// Resolves the player's attack and the battle-end check that follows it.
    ///
    /// On success the battle is in [`Phase::EnemyTurn`] unless the attack
    /// ended the wave or the run. `target` is an index into the current
    /// wave's enemies.
    pub fn submit_player_attack(
        &mut self,
        env: BattleEnv<'_>,
        attack_name: &str,
        target: Option<usize>,
        rolls: &mut dyn RollSource,
    ) -> Result<TurnReport, BattleError> {
        self.ensure_phase(Phase::AwaitingPlayerChoice)?;

        let moveset = env.attacks().attacks_for(&self.state.player.archetype);
        let attack = self
            .state
            .loadout
            .attacks(moveset)
            .find(|attack| attack.name == attack_name)
            .ok_or_else(|| BattleError::UnknownAttack {
                attack: attack_name.to_owned(),
            })?;

        let remaining = self.state.player.cooldowns.remaining(&attack.name);
        if remaining > 0 {
            return Err(BattleError::AttackOnCooldown {
                attack: attack.name.clone(),
                remaining,
            });
        }

        let indices = select_targets(attack, &self.state.enemies, target)
            .map_err(|error| BattleError::from_targeting(&attack.name, error))?;
        let targets: Vec<CombatantId> =
            indices.iter().map(|&i| self.state.enemies[i].id).collect();

        let mut report = TurnReport::new(self.state.phase);
        self.state.stats.rounds += 1;

        if self.state.player.status.consume_stun() {
            report.events.push(BattleEvent::TurnSkipped {
                combatant: CombatantId::PLAYER,
                reason: SkipReason::Stunned,
            });
            report.player_action = Some(PlayerAction::Stunned {
                attack: attack.name.clone(),
            });
        } else {
            let params = self.combat_params();
            let state = &mut *self.state;
            let mut field = Participants::new(&mut state.player, &mut state.enemies);
            let result = resolve_attack(
                attack,
                CombatantId::PLAYER,
                &targets,
                &mut field,
                rolls,
                params,
            );
            state.player.cooldowns.start(&attack.name, attack.max_cooldown);

            self.record_player_resolution(&result);
            report.events.extend(BattleEvent::from_resolution(&result, &targets));
            report.player_action = Some(PlayerAction::Resolved(result));
        }

        self.check_after_player(env, rolls, &mut report);
        report.phase = self.state.phase;
        Ok(report)
    }

    /// Lets the round pass when every unlocked attack is on cooldown.
    ///
    /// The round tick and enemy turns run exactly as after an attack, so
    /// cooldowns keep counting down. A pending stun is consumed by the pass.
    pub fn pass_turn(
        &mut self,
        env: BattleEnv<'_>,
        rolls: &mut dyn RollSource,
    ) -> Result<TurnReport, BattleError> {
        self.ensure_phase(Phase::AwaitingPlayerChoice)?;

        let moveset = env.attacks().attacks_for(&self.state.player.archetype);
        if let Some(ready) = self
            .state
            .loadout
            .attacks(moveset)
            .find(|attack| self.state.player.cooldowns.remaining(&attack.name) == 0)
        {
            return Err(BattleError::AttackReady {
                attack: ready.name.clone(),
            });
        }

        let mut report = TurnReport::new(self.state.phase);
        self.state.stats.rounds += 1;

        let reason = if self.state.player.status.consume_stun() {
            SkipReason::Stunned
        } else {
            SkipReason::NoReadyAttack
        };
        report.events.push(BattleEvent::TurnSkipped {
            combatant: CombatantId::PLAYER,
            reason,
        });
        report.player_action = Some(PlayerAction::Passed { reason });

        self.check_after_player(env, rolls, &mut report);
        report.phase = self.state.phase;
        Ok(report)
    }

    /// Applies an offered upgrade and spawns the next wave.
    pub fn select_upgrade(
        &mut self,
        env: BattleEnv<'_>,
        upgrade_id: &str,
        rolls: &mut dyn RollSource,
    ) -> Result<TurnReport, BattleError> {
        self.ensure_phase(Phase::ChoosingUpgrade)?;
        let upgrade = self
            .state
            .offers
            .iter()
            .find(|u| u.id == upgrade_id)
            .cloned()
            .ok_or_else(|| BattleError::UpgradeNotOffered {
                id: upgrade_id.to_owned(),
            })?;

        let mut report = TurnReport::new(self.state.phase);
        let moveset = env.attacks().attacks_for(&self.state.player.archetype);
        let state = &mut *self.state;
        let applied = apply_upgrade(&upgrade, &mut state.player, &mut state.loadout, moveset);
        state.ledger.record(&upgrade.id);
        state.stats.upgrades_taken.push(upgrade.id.clone());
        state.stats.healing_done += applied.healed;

        report.events.push(BattleEvent::UpgradeChosen {
            id: upgrade.id.clone(),
        });
        if let Some(attack) = applied.unlocked_attack {
            report.events.push(BattleEvent::AttackUnlocked { attack });
        }

        self.spawn_next_wave(rolls, &mut report);
        report.phase = self.state.phase;
        Ok(report)
    }

    /// Declines every offer and spawns the next wave.
    pub fn skip_upgrade(&mut self, rolls: &mut dyn RollSource) -> Result<TurnReport, BattleError> {
        self.ensure_phase(Phase::ChoosingUpgrade)?;
        if !self.state.config.allow_skip_upgrade {
            return Err(BattleError::SkipNotAllowed);
        }

        let mut report = TurnReport::new(self.state.phase);
        report.events.push(BattleEvent::UpgradeSkipped);
        self.spawn_next_wave(rolls, &mut report);
        report.phase = self.state.phase;
        Ok(report)
    }

    fn ensure_phase(&self, expected: Phase) -> Result<(), BattleError> {
        let actual = self.state.phase;
        if actual.is_over() {
            return Err(BattleError::BattleOver { phase: actual });
        }
        if actual != expected {
            return Err(BattleError::WrongPhase { expected, actual });
        }
        Ok(())
    }

    fn combat_params(&self) -> CombatParams {
        CombatParams {
            crit_multiplier: self.state.config.crit_multiplier,
        }
    }

    fn record_player_resolution(&mut self, result: &ResolutionResult) {
        let stats = &mut self.state.stats;
        stats.damage_dealt += result.total_damage();
        stats.damage_taken += result.self_damage;
        stats.healing_done += result.total_healing();
        stats.critical_hits += result.per_target.iter().filter(|t| t.is_crit).count() as u32;
        stats.enemies_defeated += result.kills().count() as u32;
    }

    /// Battle-end check after the player's action, including the round tick.
    fn check_after_player(
        &mut self,
        env: BattleEnv<'_>,
        rolls: &mut dyn RollSource,
        report: &mut TurnReport,
    ) {
        if self.end_if_decided(env, rolls, report) {
            return;
        }

        self.round_tick(report);
        if self.end_if_decided(env, rolls, report) {
            return;
        }

        self.state.phase = Phase::EnemyTurn;
        self.state.enemy_queue = self.state.alive_enemies().map(|e| e.id).collect();
    }

    /// Moves to defeat or to the wave-clear flow when either side is wiped out.
    /// Returns `true` if the round is over.
    fn end_if_decided(
        &mut self,
        env: BattleEnv<'_>,
        rolls: &mut dyn RollSource,
        report: &mut TurnReport,
    ) -> bool {
        if !self.state.player.is_alive() {
            self.finish_run(Phase::Defeat, report);
            return true;
        }
        if self.state.all_enemies_dead() {
            self.wave_cleared(env, rolls, report);
            return true;
        }
        false
    }

    fn finish_run(&mut self, phase: Phase, report: &mut TurnReport) {
        self.state.phase = phase;
        self.state.enemy_queue.clear();
        self.state.offers.clear();

        let stats = self.state.stats.clone();
        report.events.push(match phase {
            Phase::Victory => BattleEvent::Victory {
                stats: stats.clone(),
            },
            _ => BattleEvent::Defeat {
                stats: stats.clone(),
            },
        });
        report.stats = Some(stats);
    }

    fn wave_cleared(
        &mut self,
        env: BattleEnv<'_>,
        rolls: &mut dyn RollSource,
        report: &mut TurnReport,
    ) {
        self.state.stats.waves_cleared += 1;
        self.state.enemy_queue.clear();
        report.events.push(BattleEvent::WaveCleared {
            wave: self.state.wave.number,
        });

        if self.state.wave.number >= self.state.config.waves.max_waves {
            self.finish_run(Phase::Victory, report);
            return;
        }

        let moveset = env.attacks().attacks_for(&self.state.player.archetype);
        let context = OfferContext {
            ledger: &self.state.ledger,
            loadout: &self.state.loadout,
            moveset,
            wave: self.state.wave.number,
        };
        let offers = generate_offers(
            env.upgrades().upgrades(),
            &context,
            self.state.config.upgrade_choices,
            &self.state.config.rarity,
            rolls,
        );

        if offers.is_empty() {
            self.spawn_next_wave(rolls, report);
            return;
        }

        report.events.push(BattleEvent::UpgradesOffered {
            ids: offers.iter().map(|u| u.id.clone()).collect(),
        });
        report.offers = offers.clone();
        self.state.offers = offers;
        self.state.phase = Phase::ChoosingUpgrade;
    }

    /// Spawns the next wave and hands the turn back to the player.
    ///
    /// The player's cooldowns and status effects reset between waves; health,
    /// shield, modifiers and unlocks carry over.
    fn spawn_next_wave(&mut self, rolls: &mut dyn RollSource, report: &mut TurnReport) {
        let number = self.state.wave.number + 1;
        let (wave, enemies) = spawn_wave(
            number,
            &self.state.config.waves,
            self.state.next_enemy_id,
            rolls,
        );

        self.state.next_enemy_id += wave.spawned;
        self.state.wave = wave;
        self.state.enemies = enemies;
        self.state.offers.clear();
        self.state.enemy_queue.clear();
        self.state.player.cooldowns.clear();
        self.state.player.status.clear();
        self.state.phase = Phase::AwaitingPlayerChoice;

        report.events.push(BattleEvent::WaveStarted {
            wave: wave.number,
            enemies: self
                .state
                .enemies
                .iter()
                .map(|e| (e.id, e.archetype.clone()))
                .collect(),
            enemy_health: wave.enemy_health,
        });
    }
}
