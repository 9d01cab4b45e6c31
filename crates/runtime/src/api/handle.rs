//! Cloneable façade for issuing commands to a running battle.
//!
//! [`BattleHandle`] hides channel plumbing and offers async helpers for
//! playing turns, choosing upgrades, or streaming events from specific topics.
use std::collections::HashMap;

use tokio::sync::{broadcast, mpsc, oneshot};

use battle_core::{AvailableAttack, BattleState, BattleStateView, TurnReport, UpgradeDefinition};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with one battle
#[derive(Clone)]
pub struct BattleHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl BattleHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Unlocked player attacks in catalog order, with remaining cooldowns.
    pub async fn available_attacks(&self) -> Result<Vec<AvailableAttack>> {
        self.request(|reply| Command::AvailableAttacks { reply }).await
    }

    /// Plays one round: the player's attack, then every enemy turn.
    ///
    /// `target` indexes the current wave's enemies and may be omitted when a
    /// single enemy is alive. Rule violations come back as
    /// [`RuntimeError::Battle`] with the battle untouched.
    pub async fn submit_player_attack(
        &self,
        attack: impl Into<String>,
        target: Option<usize>,
    ) -> Result<TurnReport> {
        let attack = attack.into();
        self.request(|reply| Command::SubmitPlayerAttack {
            attack,
            target,
            reply,
        })
        .await?
    }

    /// Lets the round pass when every unlocked attack is on cooldown.
    ///
    /// Enemy turns follow as after an attack. Fails with
    /// [`BattleError::AttackReady`](battle_core::BattleError::AttackReady)
    /// while any attack could be used.
    pub async fn pass_turn(&self) -> Result<TurnReport> {
        self.request(|reply| Command::PassTurn { reply }).await?
    }

    /// Host-facing summary of the battle.
    pub async fn battle_state(&self) -> Result<BattleStateView> {
        self.request(|reply| Command::QueryView { reply }).await
    }

    /// Full copy of the battle state (read-only snapshot)
    pub async fn query_state(&self) -> Result<BattleState> {
        self.request(|reply| Command::QueryState { reply }).await
    }

    /// Upgrades currently offered; empty outside the upgrade choice.
    pub async fn upgrade_offers(&self) -> Result<Vec<UpgradeDefinition>> {
        self.request(|reply| Command::UpgradeOffers { reply }).await
    }

    pub async fn select_upgrade(&self, id: impl Into<String>) -> Result<TurnReport> {
        let id = id.into();
        self.request(|reply| Command::SelectUpgrade { id, reply })
            .await?
    }

    pub async fn skip_upgrade(&self) -> Result<TurnReport> {
        self.request(|reply| Command::SkipUpgrade { reply }).await?
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Combat` - Attacks, damage, statuses, skipped turns
    /// - `Topic::Progression` - Waves, upgrades, unlocks, victory and defeat
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use battle_runtime::Topic;
    ///
    /// let mut progression = handle.subscribe(Topic::Progression);
    /// while let Ok(event) = progression.recv().await {
    ///     // Update the wave counter
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
