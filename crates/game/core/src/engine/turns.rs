use super::{BattleEngine, BattleError, BattleEvent, EnemyAction, SkipReason, TurnReport};
use crate::ai::EnemyStrategy;
use crate::combat::{Participants, resolve_attack};
use crate::env::{BattleEnv, RollSource};
use crate::state::{Combatant, CombatantId, Phase, StatusTick};

/// Enemy turns and the round tick.
impl BattleEngine<'_> {
    /// Enemies still to act this enemy turn, in spawn order.
    pub fn enemy_queue(&self) -> Vec<CombatantId> {
        self.state.enemy_queue()
    }

    /// Resolves every queued enemy with `strategy`, then ends the enemy turn.
    pub fn run_enemy_turns(
        &mut self,
        env: BattleEnv<'_>,
        strategy: &dyn EnemyStrategy,
        rolls: &mut dyn RollSource,
    ) -> Result<TurnReport, BattleError> {
        self.ensure_phase(Phase::EnemyTurn)?;
        let mut report = TurnReport::new(self.state.phase);

        while let Some(id) = self.state.enemy_queue.front().copied() {
            let choice = self.state.enemy(id).and_then(|enemy| {
                let ready = self.state.ready_attacks(env.attacks(), id);
                let snapshot = self.state.snapshot(id, &ready);
                strategy
                    .choose_attack(enemy, &ready, &snapshot)
                    .map(|attack| attack.name.clone())
            });
            let step = self.resolve_enemy_action(env, id, choice.as_deref(), rolls)?;
            report.merge(step);
        }

        report.merge(self.finish_enemy_turns(env, rolls)?);
        Ok(report)
    }

    /// Resolves the turn of the next queued enemy.
    ///
    /// `attack` is the chosen ready attack, or `None` to skip. A stunned enemy
    /// skips regardless of the choice.
    pub fn resolve_enemy_action(
        &mut self,
        env: BattleEnv<'_>,
        id: CombatantId,
        attack: Option<&str>,
        rolls: &mut dyn RollSource,
    ) -> Result<TurnReport, BattleError> {
        self.ensure_phase(Phase::EnemyTurn)?;
        if self.state.enemy_queue.front() != Some(&id) {
            return Err(BattleError::NotEnemyTurn { id });
        }

        let stunned = self
            .state
            .enemy(id)
            .is_some_and(|e| e.status.has(crate::state::StatusEffectKind::Stun));
        let chosen = match attack {
            Some(name) if !stunned => {
                let ready = self.state.ready_attacks(env.attacks(), id);
                let found = ready.into_iter().find(|a| a.name == name);
                Some(found.ok_or_else(|| self.unavailable(env, id, name))?)
            }
            _ => None,
        };

        self.state.enemy_queue.pop_front();
        let mut report = TurnReport::new(self.state.phase);

        let alive = self.state.enemy(id).is_some_and(Combatant::is_alive);
        let action = match chosen {
            _ if !alive || !self.state.player.is_alive() => EnemyAction::Skipped {
                enemy: id,
                reason: SkipReason::NoReadyAttack,
            },
            _ if stunned => {
                if let Some(enemy) = self.state.enemies.iter_mut().find(|e| e.id == id) {
                    enemy.status.consume_stun();
                }
                EnemyAction::Skipped {
                    enemy: id,
                    reason: SkipReason::Stunned,
                }
            }
            None => EnemyAction::Skipped {
                enemy: id,
                reason: SkipReason::NoReadyAttack,
            },
            Some(attack) => {
                let params = self.combat_params();
                let targets = [CombatantId::PLAYER];
                let state = &mut *self.state;
                let mut field = Participants::new(&mut state.player, &mut state.enemies);
                let result = resolve_attack(attack, id, &targets, &mut field, rolls, params);
                if let Some(enemy) = state.enemies.iter_mut().find(|e| e.id == id) {
                    enemy.cooldowns.start(&attack.name, attack.max_cooldown);
                }

                let stats = &mut state.stats;
                stats.damage_taken += result
                    .per_target
                    .iter()
                    .filter(|t| t.target.is_player())
                    .map(|t| t.damage)
                    .sum::<f32>();
                stats.enemies_defeated += u32::from(result.attacker_died);

                report.events.extend(BattleEvent::from_resolution(&result, &targets));
                EnemyAction::Attacked(result)
            }
        };

        if let EnemyAction::Skipped { enemy, reason } = &action {
            report.events.push(BattleEvent::TurnSkipped {
                combatant: *enemy,
                reason: *reason,
            });
        }
        report.enemy_actions.push(action);

        if !self.state.player.is_alive() {
            self.state.enemy_queue.clear();
        }
        Ok(report)
    }

    /// Ends the enemy turn once every queued enemy has acted.
    pub fn finish_enemy_turns(
        &mut self,
        env: BattleEnv<'_>,
        rolls: &mut dyn RollSource,
    ) -> Result<TurnReport, BattleError> {
        self.ensure_phase(Phase::EnemyTurn)?;
        if !self.state.enemy_queue.is_empty() {
            return Err(BattleError::EnemyTurnPending {
                remaining: self.state.enemy_queue.len(),
            });
        }

        let mut report = TurnReport::new(self.state.phase);
        if !self.end_if_decided(env, rolls, &mut report) {
            self.state.phase = Phase::AwaitingPlayerChoice;
        }
        report.phase = self.state.phase;
        Ok(report)
    }

    fn unavailable(&self, env: BattleEnv<'_>, id: CombatantId, name: &str) -> BattleError {
        let remaining = self
            .state
            .enemy(id)
            .map_or(0, |enemy| enemy.cooldowns.remaining(name));
        let known = self
            .state
            .enemy(id)
            .is_some_and(|enemy| env.attacks().find_by_name(&enemy.archetype, name).is_ok());

        if known && remaining > 0 {
            BattleError::AttackOnCooldown {
                attack: name.to_owned(),
                remaining,
            }
        } else {
            BattleError::UnknownAttack {
                attack: name.to_owned(),
            }
        }
    }

    /// Once-per-round upkeep: cooldowns, status durations, damage and healing
    /// over time, and the player's regeneration.
    pub(super) fn round_tick(&mut self, report: &mut TurnReport) {
        let regen = self.state.player.modifiers.regen_per_turn;
        let state = &mut *self.state;

        let player_tick = tick_combatant(&mut state.player, regen, report);
        state.stats.damage_taken += player_tick.damage;
        state.stats.healing_done += player_tick.healing;

        for enemy in state.enemies.iter_mut().filter(|e| e.is_alive()) {
            let tick = tick_combatant(enemy, 0.0, report);
            state.stats.damage_dealt += tick.damage;
            if !enemy.is_alive() {
                state.stats.enemies_defeated += 1;
            }
        }
    }
}

/// Ticks one combatant and reports the health actually changed.
fn tick_combatant(combatant: &mut Combatant, regen: f32, report: &mut TurnReport) -> StatusTick {
    combatant.cooldowns.tick();
    let tick = combatant.status.tick();

    let damage = combatant.lose_health(tick.damage);
    let healing = combatant.heal(tick.healing + regen);
    if damage > 0.0 || healing > 0.0 {
        report.events.push(BattleEvent::StatusTicked {
            target: combatant.id,
            damage,
            healing,
        });
    }
    for kind in &tick.expired {
        report.events.push(BattleEvent::StatusExpired {
            target: combatant.id,
            kind: *kind,
        });
    }
    if !combatant.is_alive() {
        report.events.push(BattleEvent::Defeated {
            combatant: combatant.id,
        });
    }

    debug_assert!(combatant.invariants_hold(), "invariants violated by tick on {}", combatant.id);

    StatusTick {
        damage,
        healing,
        expired: tick.expired,
    }
}
