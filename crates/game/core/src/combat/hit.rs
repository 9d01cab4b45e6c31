//! Accuracy, critical and self-KO checks.
//!
//! Every check compares a uniform draw in `[0, 1)` against a probability.
//! Crits and self-KOs fire when the draw falls strictly below it, so a chance
//! of 0 never fires. An attack only misses when the draw exceeds its
//! accuracy, so a draw equal to the accuracy still connects.

use crate::attack::AttackDefinition;
use crate::stats::CombatModifiers;

/// Attack accuracy plus the attacker's bonus, capped to `[0, 1]`.
pub fn effective_accuracy(attack: &AttackDefinition, modifiers: &CombatModifiers) -> f32 {
    (attack.accuracy + modifiers.accuracy_bonus).clamp(0.0, 1.0)
}

/// Attack crit chance plus the attacker's bonus, capped to `[0, 1]`.
pub fn effective_crit_chance(attack: &AttackDefinition, modifiers: &CombatModifiers) -> f32 {
    (attack.crit_chance + modifiers.crit_chance_bonus).clamp(0.0, 1.0)
}

/// Returns `true` if the attack connects.
pub fn check_hit(accuracy: f32, roll: f32) -> bool {
    roll <= accuracy
}

pub fn check_crit(crit_chance: f32, roll: f32) -> bool {
    roll < crit_chance
}

/// Returns `true` if a self-KO attack fails and knocks out its user.
pub fn check_self_ko(attack: &AttackDefinition, roll: f32) -> bool {
    attack.can_self_ko && roll < attack.self_ko_fail_chance
}
