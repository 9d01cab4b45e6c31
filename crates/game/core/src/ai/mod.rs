//! Enemy decision making.
//!
//! An [`EnemyStrategy`] picks one of an enemy's ready attacks. The engine
//! only ever offers attacks that are off cooldown, and an enemy whose
//! strategy returns `None` skips its turn.

use crate::attack::{AttackDefinition, AttackKind};
use crate::state::{ArchetypeId, Combatant, CombatantId, StatusEffectKind};

/// Read-only view of the battle handed to strategies and advisory policies.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleSnapshot {
    pub wave: u32,
    pub round: u32,
    /// The enemy about to act.
    pub acting: CombatantId,
    pub player: CombatantSnapshot,
    pub enemies: Vec<CombatantSnapshot>,
    pub ready_attacks: Vec<AttackSummary>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantSnapshot {
    pub id: CombatantId,
    pub archetype: ArchetypeId,
    pub health: f32,
    pub max_health: f32,
    pub shield: f32,
    pub statuses: Vec<StatusEffectKind>,
}

impl From<&Combatant> for CombatantSnapshot {
    fn from(combatant: &Combatant) -> Self {
        Self {
            id: combatant.id,
            archetype: combatant.archetype.clone(),
            health: combatant.current_health,
            max_health: combatant.max_health,
            shield: combatant.shield,
            statuses: combatant.status.iter().map(|s| s.kind).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackSummary {
    pub name: String,
    pub kind: AttackKind,
    pub base_damage: f32,
    pub accuracy: f32,
    pub max_cooldown: u32,
}

impl From<&AttackDefinition> for AttackSummary {
    fn from(attack: &AttackDefinition) -> Self {
        Self {
            name: attack.name.clone(),
            kind: attack.kind,
            base_damage: attack.base_damage,
            accuracy: attack.accuracy,
            max_cooldown: attack.max_cooldown,
        }
    }
}

/// Chooses an enemy's attack for its turn.
pub trait EnemyStrategy: Send + Sync {
    /// Picks one of `ready` (in catalog order), or `None` to skip the turn.
    fn choose_attack<'a>(
        &self,
        enemy: &Combatant,
        ready: &[&'a AttackDefinition],
        snapshot: &BattleSnapshot,
    ) -> Option<&'a AttackDefinition>;
}

/// Default heuristic: the ready attack with the highest base damage.
///
/// Ties go to the attack listed first in the catalog.
#[derive(Clone, Copy, Debug, Default)]
pub struct HighestDamageStrategy;

impl EnemyStrategy for HighestDamageStrategy {
    fn choose_attack<'a>(
        &self,
        _enemy: &Combatant,
        ready: &[&'a AttackDefinition],
        _snapshot: &BattleSnapshot,
    ) -> Option<&'a AttackDefinition> {
        ready.iter().copied().fold(None, |best, attack| match best {
            Some(current) if current.base_damage >= attack.base_damage => Some(current),
            _ => Some(attack),
        })
    }
}

/// Finds a ready attack by name, as returned by an external policy.
pub fn ready_by_name<'a>(
    ready: &[&'a AttackDefinition],
    name: &str,
) -> Option<&'a AttackDefinition> {
    let name = name.trim();
    ready
        .iter()
        .copied()
        .find(|attack| attack.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> BattleSnapshot {
        let player = Combatant::player(ArchetypeId::new("Brawler"), 100.0);
        BattleSnapshot {
            wave: 1,
            round: 1,
            acting: CombatantId(1),
            player: CombatantSnapshot::from(&player),
            enemies: Vec::new(),
            ready_attacks: Vec::new(),
        }
    }

    fn goblin() -> Combatant {
        Combatant::enemy(CombatantId(1), ArchetypeId::new("Goblin"), 30.0)
    }

    #[test]
    fn picks_the_highest_base_damage() {
        let stab = AttackDefinition::new("Stab", AttackKind::MeleeHit, 6.0);
        let bomb = AttackDefinition::new("Bomb", AttackKind::Projectile, 11.0);
        let ready = [&stab, &bomb];
        let choice = HighestDamageStrategy.choose_attack(&goblin(), &ready, &snapshot());
        assert_eq!(choice.map(|a| a.name.as_str()), Some("Bomb"));
    }

    #[test]
    fn ties_go_to_catalog_order() {
        let first = AttackDefinition::new("First", AttackKind::MeleeHit, 8.0);
        let second = AttackDefinition::new("Second", AttackKind::MeleeHit, 8.0);
        let ready = [&first, &second];
        let choice = HighestDamageStrategy.choose_attack(&goblin(), &ready, &snapshot());
        assert_eq!(choice.map(|a| a.name.as_str()), Some("First"));
    }

    #[test]
    fn nothing_ready_skips_the_turn() {
        assert!(HighestDamageStrategy
            .choose_attack(&goblin(), &[], &snapshot())
            .is_none());
    }

    #[test]
    fn names_match_loosely() {
        let stab = AttackDefinition::new("Stab", AttackKind::MeleeHit, 6.0);
        let ready = [&stab];
        assert!(ready_by_name(&ready, "  stab\n").is_some());
        assert!(ready_by_name(&ready, "Bomb").is_none());
    }
}
