//! High-level runtime orchestrator.
//!
//! The runtime owns the battle worker, wires up command/event channels, and
//! exposes a builder-based API for hosts to start a battle and drive it
//! through a [`BattleHandle`].

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::info;

use battle_content::Content;
use battle_core::{
    ArchetypeId, BattleConfig, BattleEnv, SeededRolls, StaticCatalog, TurnReport, WaveConfig,
    start_battle,
};

use crate::api::{
    AdvisedEnemyStrategy, AdvisoryPolicy, BattleHandle, PresentationSink, Result, RuntimeError,
};
use crate::events::{Event, EventBus, Topic};
use crate::workers::{BattleWorker, Command};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub battle: BattleConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Upper bound on one advisory consultation.
    pub advisory_timeout: Duration,
}

impl RuntimeConfig {
    pub const DEFAULT_ADVISORY_TIMEOUT: Duration = Duration::from_secs(2);
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            battle: BattleConfig::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
            advisory_timeout: Self::DEFAULT_ADVISORY_TIMEOUT,
        }
    }
}

/// One running battle.
///
/// Design: the runtime owns the worker task; [`BattleHandle`] provides a
/// cloneable façade for clients.
pub struct BattleRuntime {
    handle: BattleHandle,
    seed: u64,
    opening: TurnReport,
    worker_handle: JoinHandle<()>,
}

impl BattleRuntime {
    /// Create a new runtime builder
    pub fn builder() -> BattleRuntimeBuilder {
        BattleRuntimeBuilder::new()
    }

    /// Get a cloneable handle to this battle
    pub fn handle(&self) -> BattleHandle {
        self.handle.clone()
    }

    /// Seed the battle's rolls derive from; replaying it reproduces the run.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Report of the battle start (the first wave's spawn).
    pub fn opening_report(&self) -> &TurnReport {
        &self.opening
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    /// Shutdown the runtime gracefully
    ///
    /// Waits for the worker, which stops once every cloned handle is dropped.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`BattleRuntime`] with flexible configuration.
pub struct BattleRuntimeBuilder {
    config: RuntimeConfig,
    catalog: Option<Arc<StaticCatalog>>,
    player_archetype: ArchetypeId,
    seed: Option<u64>,
    advisory: Option<Arc<dyn AdvisoryPolicy>>,
    sink: Option<Arc<dyn PresentationSink>>,
    event_bus: Option<EventBus>,
}

impl BattleRuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            catalog: None,
            player_archetype: ArchetypeId::fallback(),
            seed: None,
            advisory: None,
            sink: None,
            event_bus: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn battle_config(mut self, battle: BattleConfig) -> Self {
        self.config.battle = battle;
        self
    }

    pub fn waves(mut self, waves: WaveConfig) -> Self {
        self.config.battle.waves = waves;
        self
    }

    /// Set the required attack and upgrade catalog
    pub fn catalog(self, catalog: StaticCatalog) -> Self {
        self.shared_catalog(Arc::new(catalog))
    }

    pub fn shared_catalog(mut self, catalog: Arc<StaticCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Use loaded content for both the catalog and the battle rules.
    pub fn content(mut self, content: Content) -> Self {
        self.config.battle = content.config;
        self.catalog(content.catalog)
    }

    pub fn player_archetype(mut self, archetype: impl Into<ArchetypeId>) -> Self {
        self.player_archetype = archetype.into();
        self
    }

    /// Fix the battle seed; a random one is drawn otherwise.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set an advisory policy for enemy attack selection (optional)
    pub fn advisory_policy(mut self, policy: impl AdvisoryPolicy + 'static) -> Self {
        self.advisory = Some(Arc::new(policy));
        self
    }

    /// Set a presentation sink for animations and sound cues (optional)
    pub fn presentation(mut self, sink: impl PresentationSink + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Publish to an existing bus, so subscribers see the opening events too.
    pub fn event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    /// Starts a battle for `player_archetype` with the given wave rules.
    pub async fn start_battle(
        self,
        player_archetype: impl Into<ArchetypeId>,
        waves: WaveConfig,
    ) -> Result<BattleRuntime> {
        self.player_archetype(player_archetype).waves(waves).build().await
    }

    /// Start the battle and spawn its worker
    pub async fn build(self) -> Result<BattleRuntime> {
        let catalog = self.catalog.ok_or(RuntimeError::MissingCatalog)?;
        catalog.validate().map_err(RuntimeError::Catalog)?;

        let seed = self.seed.unwrap_or_else(rand::random);
        let mut rolls = SeededRolls::new(seed);
        let env = BattleEnv::from_catalog(&*catalog);
        let (state, opening) = start_battle(
            env,
            self.player_archetype,
            self.config.battle,
            &mut rolls,
        );
        info!(seed, player = %state.player.archetype, "battle started");

        let event_bus = self
            .event_bus
            .unwrap_or_else(|| EventBus::with_capacity(self.config.event_buffer_size));
        for event in &opening.events {
            if let Some(sink) = &self.sink {
                sink.present(event);
            }
            event_bus.publish(Event::from(event.clone()));
        }

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let handle = BattleHandle::new(command_tx, event_bus.clone());

        let advisor = self
            .advisory
            .map(|policy| AdvisedEnemyStrategy::new(policy, self.config.advisory_timeout));
        let worker = BattleWorker::new(state, rolls, Arc::clone(&catalog), command_rx, event_bus)
            .with_advisor(advisor)
            .with_sink(self.sink);

        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        Ok(BattleRuntime {
            handle,
            seed,
            opening,
            worker_handle,
        })
    }
}
