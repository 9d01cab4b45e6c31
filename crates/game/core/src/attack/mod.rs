//! Attack definitions shared by the catalog, the resolver and the AI.
//!
//! An [`AttackDefinition`] is immutable catalog data. Runtime state that
//! changes while a battle runs (cooldowns, health) lives on the
//! [`Combatant`](crate::state::Combatant), never on the definition.

mod targeting;

pub use targeting::{TargetingError, select_targets};

use crate::error::{ErrorSeverity, GameError};
use crate::state::StatusEffectKind;

/// Sentinel for `number_of_targets` meaning "every alive enemy".
pub const ALL_TARGETS: u32 = u32::MAX;

/// How an attack is delivered.
///
/// The kind only decides targeting arity; the numeric rules are identical
/// for every damaging kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackKind {
    /// Close-range strike against one target.
    MeleeHit,
    /// Ranged shot against one (or `number_of_targets`) target(s).
    Projectile,
    /// Hits every alive enemy regardless of `number_of_targets`.
    AreaEffect,
    /// Dash-in strike; targets like [`AttackKind::MeleeHit`].
    MoveAndStrike,
    /// Restores health instead of dealing damage.
    Heal,
}

impl AttackKind {
    pub const fn is_heal(self) -> bool {
        matches!(self, Self::Heal)
    }

    pub const fn hits_all(self) -> bool {
        matches!(self, Self::AreaEffect)
    }
}

/// Who receives the healing of a [`AttackKind::Heal`] attack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HealTarget {
    /// The attacker heals itself.
    #[default]
    User,
    /// The most injured living ally on the attacker's side (may be the user).
    Ally,
}

/// A status effect granted by an attack.
///
/// Buffs land on the attacker, debuffs on every target that was hit.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffectSpec {
    pub kind: StatusEffectKind,
    pub value: f32,
    /// Number of round ticks the effect survives.
    pub duration: u32,
    pub is_buff: bool,
}

impl StatusEffectSpec {
    pub fn buff(kind: StatusEffectKind, value: f32, duration: u32) -> Self {
        Self {
            kind,
            value,
            duration,
            is_buff: true,
        }
    }

    pub fn debuff(kind: StatusEffectKind, value: f32, duration: u32) -> Self {
        Self {
            kind,
            value,
            duration,
            is_buff: false,
        }
    }
}

#[cfg(feature = "serde")]
fn default_accuracy() -> f32 {
    1.0
}

#[cfg(feature = "serde")]
fn default_targets() -> u32 {
    1
}

/// Static description of one attack or ability.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackDefinition {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    /// Opaque cue identifier forwarded to the presentation layer.
    #[cfg_attr(feature = "serde", serde(default))]
    pub sound_cue: Option<String>,
    pub kind: AttackKind,
    /// Damage per target, or the heal amount for [`AttackKind::Heal`].
    #[cfg_attr(feature = "serde", serde(default))]
    pub base_damage: f32,
    #[cfg_attr(feature = "serde", serde(default = "default_accuracy"))]
    pub accuracy: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub crit_chance: f32,
    /// Flat damage the attacker deals to itself whenever the attack is used.
    #[cfg_attr(feature = "serde", serde(default))]
    pub double_edge_damage: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub can_self_ko: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub self_ko_fail_chance: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_cooldown: u32,
    #[cfg_attr(feature = "serde", serde(default = "default_targets"))]
    pub number_of_targets: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub heal_target: HealTarget,
    #[cfg_attr(feature = "serde", serde(default))]
    pub status_effects: Vec<StatusEffectSpec>,
}

impl AttackDefinition {
    /// Creates a perfectly accurate, non-critting attack with no side effects.
    pub fn new(name: impl Into<String>, kind: AttackKind, base_damage: f32) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            sound_cue: None,
            kind,
            base_damage,
            accuracy: 1.0,
            crit_chance: 0.0,
            double_edge_damage: 0.0,
            can_self_ko: false,
            self_ko_fail_chance: 0.0,
            max_cooldown: 0,
            number_of_targets: if kind.hits_all() { ALL_TARGETS } else { 1 },
            heal_target: HealTarget::User,
            status_effects: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_sound_cue(mut self, cue: impl Into<String>) -> Self {
        self.sound_cue = Some(cue.into());
        self
    }

    #[must_use]
    pub fn with_accuracy(mut self, accuracy: f32) -> Self {
        self.accuracy = accuracy;
        self
    }

    #[must_use]
    pub fn with_crit_chance(mut self, crit_chance: f32) -> Self {
        self.crit_chance = crit_chance;
        self
    }

    #[must_use]
    pub fn with_double_edge(mut self, damage: f32) -> Self {
        self.double_edge_damage = damage;
        self
    }

    #[must_use]
    pub fn with_self_ko(mut self, fail_chance: f32) -> Self {
        self.can_self_ko = true;
        self.self_ko_fail_chance = fail_chance;
        self
    }

    #[must_use]
    pub fn with_cooldown(mut self, turns: u32) -> Self {
        self.max_cooldown = turns;
        self
    }

    #[must_use]
    pub fn with_targets(mut self, count: u32) -> Self {
        self.number_of_targets = count;
        self
    }

    #[must_use]
    pub fn with_heal_target(mut self, heal_target: HealTarget) -> Self {
        self.heal_target = heal_target;
        self
    }

    #[must_use]
    pub fn with_status(mut self, spec: StatusEffectSpec) -> Self {
        self.status_effects.push(spec);
        self
    }

    pub fn is_heal(&self) -> bool {
        self.kind.is_heal()
    }

    /// Returns true if the attack targets every alive enemy.
    pub fn targets_all(&self) -> bool {
        self.kind.hits_all() || self.number_of_targets == ALL_TARGETS
    }

    /// Returns true if the caller must name a target when several enemies live.
    pub fn needs_explicit_target(&self) -> bool {
        !self.is_heal() && !self.targets_all()
    }

    /// Checks the data-model invariants of a catalog entry.
    pub fn validate(&self) -> Result<(), AttackDataError> {
        if self.name.trim().is_empty() {
            return Err(AttackDataError::EmptyName);
        }

        let probabilities = [
            ("accuracy", self.accuracy),
            ("crit_chance", self.crit_chance),
            ("self_ko_fail_chance", self.self_ko_fail_chance),
        ];
        for (field, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(AttackDataError::ProbabilityOutOfRange {
                    attack: self.name.clone(),
                    field,
                    value,
                });
            }
        }

        let amounts = [
            ("base_damage", self.base_damage),
            ("double_edge_damage", self.double_edge_damage),
        ];
        for (field, value) in amounts {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(AttackDataError::NegativeAmount {
                    attack: self.name.clone(),
                    field,
                    value,
                });
            }
        }

        if self.number_of_targets == 0 {
            return Err(AttackDataError::NoTargets {
                attack: self.name.clone(),
            });
        }

        if let Some(spec) = self
            .status_effects
            .iter()
            .find(|spec| !(spec.value >= 0.0 && spec.value.is_finite()))
        {
            return Err(AttackDataError::NegativeAmount {
                attack: self.name.clone(),
                field: spec.kind.as_str(),
                value: spec.value,
            });
        }

        Ok(())
    }
}

/// Invalid catalog data detected by [`AttackDefinition::validate`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum AttackDataError {
    #[error("attack name must not be empty")]
    EmptyName,

    #[error("attack '{attack}': {field} must be within [0, 1] (got {value})")]
    ProbabilityOutOfRange {
        attack: String,
        field: &'static str,
        value: f32,
    },

    #[error("attack '{attack}': {field} must be a non-negative number (got {value})")]
    NegativeAmount {
        attack: String,
        field: &'static str,
        value: f32,
    },

    #[error("attack '{attack}': number_of_targets must be at least 1")]
    NoTargets { attack: String },
}

impl GameError for AttackDataError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyName => "ATTACK_EMPTY_NAME",
            Self::ProbabilityOutOfRange { .. } => "ATTACK_PROBABILITY_OUT_OF_RANGE",
            Self::NegativeAmount { .. } => "ATTACK_NEGATIVE_AMOUNT",
            Self::NoTargets { .. } => "ATTACK_NO_TARGETS",
        }
    }
}
