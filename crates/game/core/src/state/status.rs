//! Status effect system for combatants.
//!
//! Status effects are temporary conditions applied by attacks. Each kind has at
//! most one active instance per combatant; reapplying a kind refreshes its
//! duration without stacking its value.
//!
//! # Round-based Duration
//!
//! Durations count round ticks. An effect applied since the previous tick is
//! *fresh*: the next tick only clears the fresh mark, so a duration of `N`
//! always covers `N` full rounds no matter where in the round it landed.

use arrayvec::ArrayVec;
use strum::EnumCount;

/// Types of status effects.
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
    strum::EnumCount,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusEffectKind {
    // ========================================================================
    // Damage / healing over time
    // ========================================================================
    /// Loses `value` health every round tick (ignores shields).
    Burn,

    /// Loses `value` health every round tick (ignores shields).
    Poison,

    /// Recovers `value` health every round tick.
    Regeneration,

    // ========================================================================
    // Control
    // ========================================================================
    /// Skips the next `duration` actions; consumed per skipped action,
    /// not by round ticks.
    Stun,

    // ========================================================================
    // Damage scaling (value is a percentage)
    // ========================================================================
    /// Outgoing damage reduced by `value` percent.
    Weaken,

    /// Outgoing damage increased by `value` percent.
    Strengthen,

    /// Incoming damage increased by `value` percent.
    Vulnerable,

    // ========================================================================
    // Instant
    // ========================================================================
    /// Grants `value` shield when applied.
    Shielded,
}

impl StatusEffectKind {
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Returns true for effects that change health on every tick.
    pub const fn ticks_health(self) -> bool {
        matches!(self, Self::Burn | Self::Poison | Self::Regeneration)
    }
}

/// One active effect on a combatant.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveStatus {
    pub kind: StatusEffectKind,
    pub value: f32,
    pub remaining: u32,
    /// Applied since the last round tick.
    pub fresh: bool,
}

/// Health changes and expirations produced by one round tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatusTick {
    pub damage: f32,
    pub healing: f32,
    pub expired: Vec<StatusEffectKind>,
}

/// Active status effects on a combatant, one slot per kind.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: ArrayVec<ActiveStatus, { StatusEffectKind::COUNT }>,
}

impl StatusEffects {
    /// Creates an empty status effect set.
    pub fn empty() -> Self {
        Self {
            effects: ArrayVec::new(),
        }
    }

    /// Checks if a specific status effect is active.
    pub fn has(&self, kind: StatusEffectKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn get(&self, kind: StatusEffectKind) -> Option<&ActiveStatus> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    /// Value of an active effect, or 0 when absent.
    pub fn value(&self, kind: StatusEffectKind) -> f32 {
        self.get(kind).map_or(0.0, |e| e.value)
    }

    /// Applies an effect.
    ///
    /// Returns `true` if an existing instance was refreshed. A refreshed effect
    /// keeps its value and takes the new duration. Zero-duration effects are
    /// not stored.
    pub fn apply(&mut self, kind: StatusEffectKind, value: f32, duration: u32) -> bool {
        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == kind) {
            existing.remaining = duration;
            existing.fresh = true;
            if duration == 0 {
                self.remove(kind);
            }
            return true;
        }

        if duration > 0 {
            // one slot per kind, so the array can never be full here
            self.effects.push(ActiveStatus {
                kind,
                value,
                remaining: duration,
                fresh: true,
            });
        }
        false
    }

    /// Uses up one stunned action. Returns `true` if the combatant was stunned.
    pub fn consume_stun(&mut self) -> bool {
        let Some(stun) = self
            .effects
            .iter_mut()
            .find(|e| e.kind == StatusEffectKind::Stun)
        else {
            return false;
        };
        stun.remaining = stun.remaining.saturating_sub(1);
        stun.fresh = false;
        if stun.remaining == 0 {
            self.remove(StatusEffectKind::Stun);
        }
        true
    }

    /// Removes a status effect immediately.
    pub fn remove(&mut self, kind: StatusEffectKind) {
        self.effects.retain(|e| e.kind != kind);
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    /// Advances every effect by one round.
    ///
    /// Fresh effects only lose their fresh mark, and stuns are left to
    /// [`consume_stun`](Self::consume_stun). Settled effects contribute
    /// their per-tick damage or healing, then lose one turn of duration and
    /// are removed when it reaches zero.
    pub fn tick(&mut self) -> StatusTick {
        let mut summary = StatusTick::default();

        for effect in self.effects.iter_mut() {
            if effect.fresh || effect.kind == StatusEffectKind::Stun {
                effect.fresh = false;
                continue;
            }

            match effect.kind {
                StatusEffectKind::Burn | StatusEffectKind::Poison => summary.damage += effect.value,
                StatusEffectKind::Regeneration => summary.healing += effect.value,
                _ => {}
            }

            effect.remaining = effect.remaining.saturating_sub(1);
            if effect.remaining == 0 {
                summary.expired.push(effect.kind);
            }
        }

        self.effects.retain(|e| e.remaining > 0);
        summary
    }

    /// Returns an iterator over all active effects.
    pub fn iter(&self) -> impl Iterator<Item = &ActiveStatus> {
        self.effects.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }
}
