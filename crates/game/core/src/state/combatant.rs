use core::fmt;

use super::{Cooldowns, StatusEffects};
use crate::stats::CombatModifiers;

/// Unique identifier for a combatant within one battle.
///
/// The player is always `0`; enemies are numbered from `1` in spawn order
/// and ids keep increasing across waves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantId(pub u32);

impl CombatantId {
    pub const PLAYER: Self = Self(0);

    pub const fn is_player(self) -> bool {
        self.0 == Self::PLAYER.0
    }
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_player() {
            f.write_str("player")
        } else {
            write!(f, "enemy#{}", self.0)
        }
    }
}

/// Character or enemy class whose moveset comes from the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ArchetypeId(String);

impl ArchetypeId {
    /// Name of the generic moveset used for unrecognized archetypes.
    pub const DEFAULT_NAME: &'static str = "Default";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn fallback() -> Self {
        Self::new(Self::DEFAULT_NAME)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_fallback(&self) -> bool {
        self.0 == Self::DEFAULT_NAME
    }
}

impl fmt::Display for ArchetypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ArchetypeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ArchetypeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Player,
    Enemy,
}

/// Split of incoming damage between shield and health.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DamageTaken {
    pub absorbed: f32,
    pub health_lost: f32,
}

impl DamageTaken {
    pub fn total(&self) -> f32 {
        self.absorbed + self.health_lost
    }
}

/// Mutable runtime state of one battle participant.
///
/// # Invariants
///
/// - `0 <= current_health <= max_health`
/// - `shield >= 0`
/// - a combatant at 0 health is dead and never acts or gets targeted
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: CombatantId,
    pub archetype: ArchetypeId,
    pub side: Side,
    pub current_health: f32,
    pub max_health: f32,
    pub shield: f32,
    pub status: StatusEffects,
    pub cooldowns: Cooldowns,
    pub modifiers: CombatModifiers,
}

impl Combatant {
    fn new(id: CombatantId, archetype: ArchetypeId, side: Side, max_health: f32) -> Self {
        let max_health = max_health.max(0.0);
        Self {
            id,
            archetype,
            side,
            current_health: max_health,
            max_health,
            shield: 0.0,
            status: StatusEffects::empty(),
            cooldowns: Cooldowns::new(),
            modifiers: CombatModifiers::default(),
        }
    }

    pub fn player(archetype: ArchetypeId, max_health: f32) -> Self {
        Self::new(CombatantId::PLAYER, archetype, Side::Player, max_health)
    }

    pub fn enemy(id: CombatantId, archetype: ArchetypeId, max_health: f32) -> Self {
        Self::new(id, archetype, Side::Enemy, max_health)
    }

    pub fn is_alive(&self) -> bool {
        self.current_health > 0.0
    }

    pub fn missing_health(&self) -> f32 {
        (self.max_health - self.current_health).max(0.0)
    }

    /// Applies damage to the shield first, then to health (clamped at 0).
    pub fn take_damage(&mut self, amount: f32) -> DamageTaken {
        let amount = amount.max(0.0);
        let absorbed = amount.min(self.shield);
        self.shield -= absorbed;

        let health_lost = (amount - absorbed).min(self.current_health);
        self.current_health -= health_lost;

        DamageTaken {
            absorbed,
            health_lost,
        }
    }

    /// Removes health directly, bypassing the shield. Returns the health lost.
    pub fn lose_health(&mut self, amount: f32) -> f32 {
        let lost = amount.max(0.0).min(self.current_health);
        self.current_health -= lost;
        lost
    }

    /// Restores health up to the maximum. Returns the amount actually healed.
    ///
    /// Dead combatants cannot be healed.
    pub fn heal(&mut self, amount: f32) -> f32 {
        if !self.is_alive() {
            return 0.0;
        }
        let healed = amount.max(0.0).min(self.missing_health());
        self.current_health += healed;
        healed
    }

    pub fn add_shield(&mut self, amount: f32) {
        self.shield += amount.max(0.0);
    }

    /// Raises the shield to at least `amount` without stacking on top of it.
    pub fn top_up_shield(&mut self, amount: f32) {
        self.shield = self.shield.max(amount);
    }

    /// Raises maximum health and heals by the same amount.
    pub fn grow_max_health(&mut self, amount: f32) {
        let amount = amount.max(0.0);
        self.max_health += amount;
        self.heal(amount);
    }

    /// Zeroes health immediately (self-KO).
    pub fn knock_out(&mut self) {
        self.current_health = 0.0;
    }

    /// Checks the health and shield invariants.
    pub fn invariants_hold(&self) -> bool {
        self.current_health >= 0.0
            && self.current_health <= self.max_health
            && self.shield >= 0.0
            && self.current_health.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slime(health: f32) -> Combatant {
        Combatant::enemy(CombatantId(1), ArchetypeId::new("Slime"), health)
    }

    #[test]
    fn shield_absorbs_before_health() {
        let mut target = slime(50.0);
        target.add_shield(15.0);

        let taken = target.take_damage(20.0);

        assert_eq!(taken.absorbed, 15.0);
        assert_eq!(taken.health_lost, 5.0);
        assert_eq!(target.shield, 0.0);
        assert_eq!(target.current_health, 45.0);
    }

    #[test]
    fn health_never_goes_negative() {
        let mut target = slime(10.0);
        let taken = target.take_damage(999.0);
        assert_eq!(taken.health_lost, 10.0);
        assert_eq!(target.current_health, 0.0);
        assert!(!target.is_alive());
        assert!(target.invariants_hold());

        assert_eq!(target.lose_health(5.0), 0.0);
        assert_eq!(target.current_health, 0.0);
    }

    #[test]
    fn healing_is_capped_and_ignores_the_dead() {
        let mut target = slime(40.0);
        target.take_damage(10.0);
        assert_eq!(target.heal(25.0), 10.0);
        assert_eq!(target.current_health, 40.0);

        target.knock_out();
        assert_eq!(target.heal(10.0), 0.0);
    }

    #[test]
    fn player_id_displays_as_player() {
        assert_eq!(CombatantId::PLAYER.to_string(), "player");
        assert_eq!(CombatantId(3).to_string(), "enemy#3");
    }
}
