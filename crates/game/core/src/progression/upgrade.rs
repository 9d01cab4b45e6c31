//! Upgrade definitions, stack bookkeeping and application.

use std::collections::BTreeMap;

use super::unlock::Loadout;
use crate::attack::AttackDefinition;
use crate::state::Combatant;
use crate::stats::ModifierStat;

/// Rarity tier of an upgrade, ordered from most to least common.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Next more common tier, used when a rarity pool is empty.
    pub const fn lower(self) -> Option<Self> {
        match self {
            Self::Common => None,
            Self::Rare => Some(Self::Common),
            Self::Epic => Some(Self::Rare),
            Self::Legendary => Some(Self::Epic),
        }
    }
}

/// One change an upgrade makes to the player.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UpgradeEffect {
    /// Adds `amount` to a modifier.
    Add { stat: ModifierStat, amount: f32 },
    /// Multiplies a modifier by `factor`.
    Scale { stat: ModifierStat, factor: f32 },
    /// Raises maximum health and heals by the same amount.
    MaxHealth(f32),
    /// One-off heal.
    Heal(f32),
    /// One-off shield.
    Shield(f32),
}

/// Which attack an upgrade unlocks.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackUnlock {
    /// Next locked attack in moveset order.
    Next,
    /// A specific attack of the player's moveset.
    Named(String),
}

/// A permanent, possibly stacking, player upgrade.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UpgradeDefinition {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    pub rarity: Rarity,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effects: Vec<UpgradeEffect>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub unlocks: Option<AttackUnlock>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub can_stack: bool,
    /// Stack cap for stackable upgrades; `None` means unlimited.
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_stacks: Option<u32>,
    /// Offerable at most once per run.
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_unique: bool,
}

impl UpgradeDefinition {
    pub fn new(id: impl Into<String>, name: impl Into<String>, rarity: Rarity) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            rarity,
            effects: Vec::new(),
            unlocks: None,
            can_stack: false,
            max_stacks: None,
            is_unique: false,
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: UpgradeEffect) -> Self {
        self.effects.push(effect);
        self
    }

    #[must_use]
    pub fn with_unlock(mut self, unlock: AttackUnlock) -> Self {
        self.unlocks = Some(unlock);
        self
    }

    #[must_use]
    pub fn stackable(mut self, max_stacks: Option<u32>) -> Self {
        self.can_stack = true;
        self.max_stacks = max_stacks;
        self
    }

    #[must_use]
    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    /// How many times this upgrade may be taken in one run.
    pub fn stack_limit(&self) -> u32 {
        if self.is_unique || !self.can_stack {
            1
        } else {
            self.max_stacks.unwrap_or(u32::MAX)
        }
    }
}

/// Upgrades taken during the run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UpgradeLedger {
    stacks: BTreeMap<String, u32>,
    history: Vec<String>,
}

impl UpgradeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stacks(&self, id: &str) -> u32 {
        self.stacks.get(id).copied().unwrap_or(0)
    }

    /// Returns true while the upgrade is below its stack limit.
    pub fn can_take(&self, upgrade: &UpgradeDefinition) -> bool {
        self.stacks(&upgrade.id) < upgrade.stack_limit()
    }

    pub fn record(&mut self, id: &str) {
        *self.stacks.entry(id.to_owned()).or_insert(0) += 1;
        self.history.push(id.to_owned());
    }

    /// Upgrade ids in the order they were taken.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn total_taken(&self) -> usize {
        self.history.len()
    }
}

/// Result of applying an upgrade to the player.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AppliedUpgrade {
    pub id: String,
    pub unlocked_attack: Option<String>,
    pub healed: f32,
}

/// Applies an upgrade's effects and unlock to the player.
///
/// The caller is responsible for stack checks and for recording the upgrade
/// in the [`UpgradeLedger`].
pub fn apply_upgrade(
    upgrade: &UpgradeDefinition,
    player: &mut Combatant,
    loadout: &mut Loadout,
    moveset: &[AttackDefinition],
) -> AppliedUpgrade {
    let mut applied = AppliedUpgrade {
        id: upgrade.id.clone(),
        ..AppliedUpgrade::default()
    };

    for effect in &upgrade.effects {
        match effect {
            UpgradeEffect::Add { stat, amount } => player.modifiers.add(*stat, *amount),
            UpgradeEffect::Scale { stat, factor } => player.modifiers.scale(*stat, *factor),
            UpgradeEffect::MaxHealth(amount) => {
                let before = player.current_health;
                player.grow_max_health(*amount);
                applied.healed += player.current_health - before;
            }
            UpgradeEffect::Heal(amount) => applied.healed += player.heal(*amount),
            UpgradeEffect::Shield(amount) => player.add_shield(*amount),
        }
    }

    if let Some(unlock) = &upgrade.unlocks {
        applied.unlocked_attack = loadout.unlock_from(unlock, moveset);
    }

    applied
}
