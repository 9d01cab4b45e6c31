//! Damage, healing and recoil formulas.

use crate::attack::AttackDefinition;
use crate::state::{StatusEffectKind, StatusEffects};
use crate::stats::CombatModifiers;

/// Outgoing damage factor from the attacker's Strengthen/Weaken effects.
pub fn outgoing_status_factor(status: &StatusEffects) -> f32 {
    let strengthen = 1.0 + status.value(StatusEffectKind::Strengthen) / 100.0;
    let weaken = (1.0 - status.value(StatusEffectKind::Weaken) / 100.0).max(0.0);
    strengthen * weaken
}

/// Incoming damage factor from the target's Vulnerable effect.
pub fn incoming_status_factor(status: &StatusEffects) -> f32 {
    1.0 + status.value(StatusEffectKind::Vulnerable) / 100.0
}

/// Damage an attack carries before target-side factors and crits.
///
/// # Formula
///
/// ```text
/// outgoing = (base_damage + flat_damage_bonus) × damage_multiplier × status
/// ```
pub fn outgoing_damage(
    attack: &AttackDefinition,
    modifiers: &CombatModifiers,
    status: &StatusEffects,
) -> f32 {
    let base = (attack.base_damage + modifiers.flat_damage_bonus).max(0.0);
    base * modifiers.damage_multiplier.max(0.0) * outgoing_status_factor(status)
}

/// Final damage against one target.
pub fn calculate_damage(
    outgoing: f32,
    target_status: &StatusEffects,
    is_critical: bool,
    crit_multiplier: f32,
) -> f32 {
    let mut damage = outgoing * incoming_status_factor(target_status);
    if is_critical {
        damage *= crit_multiplier;
    }
    damage.max(0.0)
}

/// Healing a heal attack restores, before the recipient's health cap.
pub fn heal_amount(attack: &AttackDefinition, modifiers: &CombatModifiers) -> f32 {
    (attack.base_damage * modifiers.healing_multiplier).max(0.0)
}

/// Self-damage after the attacker's double-edge reduction.
pub fn recoil_damage(attack: &AttackDefinition, modifiers: &CombatModifiers) -> f32 {
    let reduction = modifiers.double_edge_reduction.clamp(0.0, 1.0);
    (attack.double_edge_damage * (1.0 - reduction)).max(0.0)
}

/// Healing returned to the attacker for `dealt` damage.
pub fn lifesteal_amount(dealt: f32, modifiers: &CombatModifiers) -> f32 {
    if modifiers.lifesteal_percentage <= 0.0 || dealt <= 0.0 {
        return 0.0;
    }
    dealt * modifiers.lifesteal_percentage / 100.0
}
