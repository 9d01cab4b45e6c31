//! Permanent combat modifiers granted by upgrades.
//!
//! Enemies keep the neutral defaults; the player's modifiers grow over a run
//! as upgrades are selected and never reset between waves.

/// Modifier fields an upgrade can change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModifierStat {
    DamageMultiplier,
    FlatDamage,
    CritChance,
    Accuracy,
    HealingMultiplier,
    DoubleEdgeReduction,
    Lifesteal,
    RegenPerTurn,
}

/// Attacker-side combat parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatModifiers {
    /// Multiplies outgoing damage (≥ 0, default 1).
    pub damage_multiplier: f32,
    /// Added to an attack's base damage before multipliers.
    pub flat_damage_bonus: f32,
    /// Added to an attack's crit chance; the sum is capped at 1.
    pub crit_chance_bonus: f32,
    /// Added to an attack's accuracy; the sum is capped at 1.
    pub accuracy_bonus: f32,
    /// Multiplies healing from heal attacks (≥ 0, default 1).
    pub healing_multiplier: f32,
    /// Fraction of double-edge damage ignored, in `[0, 1]`.
    pub double_edge_reduction: f32,
    /// Percentage of damage dealt returned as healing.
    pub lifesteal_percentage: f32,
    /// Health restored at every round tick.
    pub regen_per_turn: f32,
}

impl Default for CombatModifiers {
    fn default() -> Self {
        Self {
            damage_multiplier: 1.0,
            flat_damage_bonus: 0.0,
            crit_chance_bonus: 0.0,
            accuracy_bonus: 0.0,
            healing_multiplier: 1.0,
            double_edge_reduction: 0.0,
            lifesteal_percentage: 0.0,
            regen_per_turn: 0.0,
        }
    }
}

impl CombatModifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, stat: ModifierStat) -> f32 {
        match stat {
            ModifierStat::DamageMultiplier => self.damage_multiplier,
            ModifierStat::FlatDamage => self.flat_damage_bonus,
            ModifierStat::CritChance => self.crit_chance_bonus,
            ModifierStat::Accuracy => self.accuracy_bonus,
            ModifierStat::HealingMultiplier => self.healing_multiplier,
            ModifierStat::DoubleEdgeReduction => self.double_edge_reduction,
            ModifierStat::Lifesteal => self.lifesteal_percentage,
            ModifierStat::RegenPerTurn => self.regen_per_turn,
        }
    }

    /// Adds `delta` to a modifier and clamps it to its legal range.
    ///
    /// Multipliers and the lifesteal/regen amounts never drop below zero;
    /// double-edge reduction stays within `[0, 1]`.
    pub fn add(&mut self, stat: ModifierStat, delta: f32) {
        let slot = match stat {
            ModifierStat::DamageMultiplier => &mut self.damage_multiplier,
            ModifierStat::FlatDamage => &mut self.flat_damage_bonus,
            ModifierStat::CritChance => &mut self.crit_chance_bonus,
            ModifierStat::Accuracy => &mut self.accuracy_bonus,
            ModifierStat::HealingMultiplier => &mut self.healing_multiplier,
            ModifierStat::DoubleEdgeReduction => &mut self.double_edge_reduction,
            ModifierStat::Lifesteal => &mut self.lifesteal_percentage,
            ModifierStat::RegenPerTurn => &mut self.regen_per_turn,
        };
        *slot += delta;

        match stat {
            ModifierStat::DoubleEdgeReduction => *slot = slot.clamp(0.0, 1.0),
            ModifierStat::DamageMultiplier
            | ModifierStat::HealingMultiplier
            | ModifierStat::Lifesteal
            | ModifierStat::RegenPerTurn => *slot = slot.max(0.0),
            ModifierStat::FlatDamage | ModifierStat::CritChance | ModifierStat::Accuracy => {}
        }
    }

    /// Multiplies a modifier by `factor`, with the same clamping as [`add`](Self::add).
    pub fn scale(&mut self, stat: ModifierStat, factor: f32) {
        let current = self.get(stat);
        self.add(stat, current * factor - current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_neutral() {
        let modifiers = CombatModifiers::default();
        assert_eq!(modifiers.damage_multiplier, 1.0);
        assert_eq!(modifiers.healing_multiplier, 1.0);
        assert_eq!(modifiers.double_edge_reduction, 0.0);
        assert_eq!(modifiers.lifesteal_percentage, 0.0);
    }

    #[test]
    fn double_edge_reduction_is_clamped_to_unit_range() {
        let mut modifiers = CombatModifiers::default();
        for _ in 0..5 {
            modifiers.add(ModifierStat::DoubleEdgeReduction, 0.3);
        }
        assert_eq!(modifiers.double_edge_reduction, 1.0);
    }

    #[test]
    fn multipliers_never_go_negative() {
        let mut modifiers = CombatModifiers::default();
        modifiers.add(ModifierStat::DamageMultiplier, -3.0);
        assert_eq!(modifiers.damage_multiplier, 0.0);
    }

    #[test]
    fn scale_multiplies_current_value() {
        let mut modifiers = CombatModifiers::default();
        modifiers.add(ModifierStat::DamageMultiplier, 0.5);
        modifiers.scale(ModifierStat::DamageMultiplier, 2.0);
        assert!((modifiers.damage_multiplier - 3.0).abs() < 1e-6);
    }
}
