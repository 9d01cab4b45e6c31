use crate::progression::{RarityWeights, UnlockMode};
use crate::state::ArchetypeId;

/// Wave progression parameters of one run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WaveConfig {
    /// Clearing this wave wins the run.
    pub max_waves: u32,
    /// Enemy health at wave 1.
    pub enemy_max_health: f32,
    /// Per-wave health growth factor.
    pub health_multiplier: f32,
    /// Archetypes enemies are drawn from; empty means `Default`.
    pub enemy_pool: Vec<ArchetypeId>,
    /// Upper bound on enemies alive at once.
    pub spawn_slots: u32,
}

impl WaveConfig {
    pub const DEFAULT_MAX_WAVES: u32 = 5;
    pub const DEFAULT_ENEMY_MAX_HEALTH: f32 = 30.0;
    pub const DEFAULT_HEALTH_MULTIPLIER: f32 = 1.1;
    pub const DEFAULT_SPAWN_SLOTS: u32 = 4;

    pub fn new() -> Self {
        Self {
            max_waves: Self::DEFAULT_MAX_WAVES,
            enemy_max_health: Self::DEFAULT_ENEMY_MAX_HEALTH,
            health_multiplier: Self::DEFAULT_HEALTH_MULTIPLIER,
            enemy_pool: Vec::new(),
            spawn_slots: Self::DEFAULT_SPAWN_SLOTS,
        }
    }

    #[must_use]
    pub fn with_max_waves(mut self, max_waves: u32) -> Self {
        self.max_waves = max_waves;
        self
    }

    #[must_use]
    pub fn with_enemy_health(mut self, base: f32, multiplier: f32) -> Self {
        self.enemy_max_health = base;
        self.health_multiplier = multiplier;
        self
    }

    #[must_use]
    pub fn with_enemy_pool<I, A>(mut self, pool: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<ArchetypeId>,
    {
        self.enemy_pool = pool.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_spawn_slots(mut self, slots: u32) -> Self {
        self.spawn_slots = slots;
        self
    }
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Tunable rules of a battle run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    pub player_max_health: f32,
    /// Damage factor applied on a critical hit.
    pub crit_multiplier: f32,
    /// Number of upgrades offered after a cleared wave.
    pub upgrade_choices: u32,
    /// Whether the player may decline every offer.
    pub allow_skip_upgrade: bool,
    pub unlock_mode: UnlockMode,
    pub rarity: RarityWeights,
    pub waves: WaveConfig,
}

impl BattleConfig {
    pub const DEFAULT_PLAYER_MAX_HEALTH: f32 = 100.0;
    pub const DEFAULT_CRIT_MULTIPLIER: f32 = 2.0;
    pub const DEFAULT_UPGRADE_CHOICES: u32 = 3;

    pub fn new() -> Self {
        Self {
            player_max_health: Self::DEFAULT_PLAYER_MAX_HEALTH,
            crit_multiplier: Self::DEFAULT_CRIT_MULTIPLIER,
            upgrade_choices: Self::DEFAULT_UPGRADE_CHOICES,
            allow_skip_upgrade: true,
            unlock_mode: UnlockMode::Full,
            rarity: RarityWeights::default(),
            waves: WaveConfig::default(),
        }
    }

    #[must_use]
    pub fn with_waves(mut self, waves: WaveConfig) -> Self {
        self.waves = waves;
        self
    }

    #[must_use]
    pub fn with_unlock_mode(mut self, mode: UnlockMode) -> Self {
        self.unlock_mode = mode;
        self
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
