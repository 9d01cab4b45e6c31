//! Battle worker that owns the authoritative [`battle_core::BattleState`].
//!
//! Receives commands from [`BattleHandle`](crate::api::BattleHandle), drives
//! [`battle_core::BattleEngine`], and publishes every reported event to the
//! EventBus. Enemy turns run here, one enemy at a time, so an advisory policy
//! can be awaited between steps while the state stays single-owner.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use battle_core::{
    AvailableAttack, BattleEngine, BattleEnv, BattleState, BattleStateView, CombatantId,
    EnemyStrategy, HighestDamageStrategy, Phase, SeededRolls, StaticCatalog, StatusEffectKind,
    TurnReport, UpgradeDefinition,
};

use crate::api::{AdvisedEnemyStrategy, PresentationSink, Result, RuntimeError};
use crate::events::{Event, EventBus};

/// Commands that can be sent to the battle worker
pub enum Command {
    /// Unlocked player attacks with their cooldowns.
    AvailableAttacks {
        reply: oneshot::Sender<Vec<AvailableAttack>>,
    },
    /// Resolve the player's attack, then every enemy turn that follows.
    SubmitPlayerAttack {
        attack: String,
        target: Option<usize>,
        reply: oneshot::Sender<Result<TurnReport>>,
    },
    /// Pass the player's turn when nothing is ready, then run enemy turns.
    PassTurn {
        reply: oneshot::Sender<Result<TurnReport>>,
    },
    /// Host-facing summary of the battle.
    QueryView { reply: oneshot::Sender<BattleStateView> },
    /// Full copy of the battle state (read-only).
    QueryState { reply: oneshot::Sender<BattleState> },
    /// Upgrades currently on offer.
    UpgradeOffers {
        reply: oneshot::Sender<Vec<UpgradeDefinition>>,
    },
    SelectUpgrade {
        id: String,
        reply: oneshot::Sender<Result<TurnReport>>,
    },
    SkipUpgrade {
        reply: oneshot::Sender<Result<TurnReport>>,
    },
}

/// Background task that processes battle commands.
pub struct BattleWorker {
    state: BattleState,
    rolls: SeededRolls,
    catalog: Arc<StaticCatalog>,
    advisor: Option<AdvisedEnemyStrategy>,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    sink: Option<Arc<dyn PresentationSink>>,
}

impl BattleWorker {
    pub fn new(
        state: BattleState,
        rolls: SeededRolls,
        catalog: Arc<StaticCatalog>,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        info!(
            player = %state.player.archetype,
            wave = state.wave.number,
            enemies = state.enemies.len(),
            "BattleWorker initialized"
        );

        Self {
            state,
            rolls,
            catalog,
            advisor: None,
            command_rx,
            event_bus,
            sink: None,
        }
    }

    pub fn with_advisor(mut self, advisor: Option<AdvisedEnemyStrategy>) -> Self {
        self.advisor = advisor;
        self
    }

    pub fn with_sink(mut self, sink: Option<Arc<dyn PresentationSink>>) -> Self {
        self.sink = sink;
        self
    }

    /// Main worker loop. Ends once every handle is dropped.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                Some(cmd) = self.command_rx.recv() => {
                    self.handle_command(cmd).await;
                }
                else => break,
            }
        }
        debug!(phase = %self.state.phase, "BattleWorker stopped");
    }

    async fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::AvailableAttacks { reply } => {
                let env = BattleEnv::from_catalog(&*self.catalog);
                let attacks = BattleEngine::new(&mut self.state).available_attacks(env);
                if reply.send(attacks).is_err() {
                    debug!("AvailableAttacks reply channel closed (caller dropped)");
                }
            }
            Command::SubmitPlayerAttack {
                attack,
                target,
                reply,
            } => {
                let result = self.handle_player_attack(&attack, target).await;
                if reply.send(result).is_err() {
                    debug!("SubmitPlayerAttack reply channel closed (caller dropped)");
                }
            }
            Command::PassTurn { reply } => {
                let result = self.handle_pass().await;
                if reply.send(result).is_err() {
                    debug!("PassTurn reply channel closed (caller dropped)");
                }
            }
            Command::QueryView { reply } => {
                if reply.send(BattleStateView::from(&self.state)).is_err() {
                    debug!("QueryView reply channel closed (caller dropped)");
                }
            }
            Command::QueryState { reply } => {
                if reply.send(self.state.clone()).is_err() {
                    debug!("QueryState reply channel closed (caller dropped)");
                }
            }
            Command::UpgradeOffers { reply } => {
                if reply.send(self.state.offers.clone()).is_err() {
                    debug!("UpgradeOffers reply channel closed (caller dropped)");
                }
            }
            Command::SelectUpgrade { id, reply } => {
                let catalog = Arc::clone(&self.catalog);
                let env = BattleEnv::from_catalog(&*catalog);
                let result = BattleEngine::new(&mut self.state)
                    .select_upgrade(env, &id, &mut self.rolls)
                    .map_err(RuntimeError::from);
                if let Ok(report) = &result {
                    self.publish(report);
                }
                if reply.send(result).is_err() {
                    debug!("SelectUpgrade reply channel closed (caller dropped)");
                }
            }
            Command::SkipUpgrade { reply } => {
                let result = BattleEngine::new(&mut self.state)
                    .skip_upgrade(&mut self.rolls)
                    .map_err(RuntimeError::from);
                if let Ok(report) = &result {
                    self.publish(report);
                }
                if reply.send(result).is_err() {
                    debug!("SkipUpgrade reply channel closed (caller dropped)");
                }
            }
        }
    }

    /// Player attack plus the enemy turns it hands over to.
    ///
    /// The returned report merges both halves; rejected attacks leave the
    /// state untouched and publish nothing.
    async fn handle_player_attack(
        &mut self,
        attack: &str,
        target: Option<usize>,
    ) -> Result<TurnReport> {
        let catalog = Arc::clone(&self.catalog);
        let env = BattleEnv::from_catalog(&*catalog);

        let report = BattleEngine::new(&mut self.state).submit_player_attack(
            env,
            attack,
            target,
            &mut self.rolls,
        )?;
        self.after_player_action(&catalog, report).await
    }

    async fn handle_pass(&mut self) -> Result<TurnReport> {
        let catalog = Arc::clone(&self.catalog);
        let env = BattleEnv::from_catalog(&*catalog);

        let report = BattleEngine::new(&mut self.state).pass_turn(env, &mut self.rolls)?;
        debug!(round = self.state.stats.rounds, "player passed");
        self.after_player_action(&catalog, report).await
    }

    /// Publishes the player's half of the round and plays out the enemy half.
    async fn after_player_action(
        &mut self,
        catalog: &StaticCatalog,
        mut report: TurnReport,
    ) -> Result<TurnReport> {
        self.publish(&report);

        if report.phase == Phase::EnemyTurn {
            let enemy_report = self.run_enemy_turns(catalog).await?;
            report.merge(enemy_report);
        }

        if report.is_over() {
            info!(phase = %report.phase, rounds = self.state.stats.rounds, "battle finished");
        }
        Ok(report)
    }

    async fn run_enemy_turns(&mut self, catalog: &StaticCatalog) -> Result<TurnReport> {
        let env = BattleEnv::from_catalog(catalog);
        let mut report = TurnReport::new(self.state.phase);

        while let Some(id) = self.state.enemy_queue().first().copied() {
            let choice =
                Self::choose_enemy_attack(&self.state, self.advisor.as_ref(), catalog, id).await;
            let step = BattleEngine::new(&mut self.state).resolve_enemy_action(
                env,
                id,
                choice.as_deref(),
                &mut self.rolls,
            )?;
            self.publish(&step);
            report.merge(step);
        }

        let finish = BattleEngine::new(&mut self.state).finish_enemy_turns(env, &mut self.rolls)?;
        self.publish(&finish);
        report.merge(finish);
        Ok(report)
    }

    /// Picks the attack of a queued enemy; `None` lets the engine record a skip.
    async fn choose_enemy_attack(
        state: &BattleState,
        advisor: Option<&AdvisedEnemyStrategy>,
        catalog: &StaticCatalog,
        id: CombatantId,
    ) -> Option<String> {
        let enemy = state.enemy(id)?;
        if !enemy.is_alive() || enemy.status.has(StatusEffectKind::Stun) {
            return None;
        }

        let ready = state.ready_attacks(catalog, id);
        let snapshot = state.snapshot(id, &ready);
        let chosen = match advisor {
            Some(advisor) => advisor.choose_attack(enemy, &ready, &snapshot).await,
            None => HighestDamageStrategy.choose_attack(enemy, &ready, &snapshot),
        };
        chosen.map(|attack| attack.name.clone())
    }

    fn publish(&self, report: &TurnReport) {
        for event in &report.events {
            if let Some(sink) = &self.sink {
                sink.present(event);
            }
            self.event_bus.publish(Event::from(event.clone()));
        }
    }
}
