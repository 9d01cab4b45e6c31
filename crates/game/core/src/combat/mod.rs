//! Combat resolution system.
//!
//! Pure functions that turn one attack into health, shield and status
//! changes. Every random decision is drawn from a
//! [`RollSource`](crate::env::RollSource), so resolutions replay exactly.
//!
//! # Core Functions
//!
//! - `resolve_attack`: complete resolution (self-KO, accuracy, damage, recoil,
//!   lifesteal, status effects)
//! - `check_hit` / `check_crit`: probability checks against a draw
//! - `calculate_damage`: final damage against one target

pub mod damage;
pub mod hit;
mod participants;
pub mod result;

pub use damage::{calculate_damage, outgoing_damage, recoil_damage};
pub use hit::{check_crit, check_hit, effective_accuracy, effective_crit_chance};
pub use participants::Participants;
pub use result::{
    AppliedStatus, AttackOutcome, CombatParams, ResolutionResult, TargetOutcome, resolve_attack,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attack::{AttackDefinition, AttackKind, HealTarget, StatusEffectSpec};
    use crate::env::{RollPurpose, ScriptedRolls};
    use crate::state::{ArchetypeId, Combatant, CombatantId, StatusEffectKind};

    fn player() -> Combatant {
        Combatant::player(ArchetypeId::new("Brawler"), 100.0)
    }

    fn slimes(count: u32, health: f32) -> Vec<Combatant> {
        (1..=count)
            .map(|i| Combatant::enemy(CombatantId(i), ArchetypeId::new("Slime"), health))
            .collect()
    }

    /// Hits, never crits, never self-KOs unless scripted.
    fn steady() -> ScriptedRolls {
        ScriptedRolls::new(0.0)
            .with(RollPurpose::Critical, [0.99; 8])
            .with(RollPurpose::SelfKnockout, [0.99; 8])
    }

    fn resolve(
        attack: &AttackDefinition,
        attacker: CombatantId,
        targets: &[CombatantId],
        player: &mut Combatant,
        enemies: &mut [Combatant],
        rolls: &mut ScriptedRolls,
    ) -> ResolutionResult {
        let mut field = Participants::new(player, enemies);
        resolve_attack(attack, attacker, targets, &mut field, rolls, CombatParams::default())
    }

    #[test]
    fn critical_hit_doubles_damage() {
        let attack = AttackDefinition::new("Slash", AttackKind::MeleeHit, 20.0)
            .with_crit_chance(0.5);
        let mut player = player();
        let mut enemies = slimes(1, 100.0);
        let mut rolls = ScriptedRolls::new(0.0).with(RollPurpose::Critical, [0.1]);

        let result = resolve(
            &attack,
            CombatantId::PLAYER,
            &[CombatantId(1)],
            &mut player,
            &mut enemies,
            &mut rolls,
        );

        assert_eq!(result.outcome, AttackOutcome::Hit);
        assert!(result.is_crit);
        assert_eq!(result.per_target[0].damage, 40.0);
        assert_eq!(enemies[0].current_health, 60.0);
    }

    #[test]
    fn shield_absorbs_first() {
        let attack = AttackDefinition::new("Slash", AttackKind::MeleeHit, 20.0);
        let mut player = player();
        let mut enemies = slimes(1, 50.0);
        enemies[0].add_shield(15.0);

        let result = resolve(
            &attack,
            CombatantId::PLAYER,
            &[CombatantId(1)],
            &mut player,
            &mut enemies,
            &mut steady(),
        );

        assert_eq!(result.per_target[0].absorbed, 15.0);
        assert_eq!(result.per_target[0].damage, 5.0);
        assert_eq!(enemies[0].shield, 0.0);
        assert_eq!(enemies[0].current_health, 45.0);
    }

    #[test]
    fn miss_leaves_target_untouched_but_applies_double_edge() {
        let attack = AttackDefinition::new("Reckless Swing", AttackKind::MeleeHit, 25.0)
            .with_accuracy(0.5)
            .with_double_edge(10.0)
            .with_status(StatusEffectSpec::debuff(StatusEffectKind::Burn, 3.0, 2));
        let mut player = player();
        let mut enemies = slimes(1, 30.0);
        let mut rolls = steady().with(RollPurpose::Accuracy, [0.9]);

        let result = resolve(
            &attack,
            CombatantId::PLAYER,
            &[CombatantId(1)],
            &mut player,
            &mut enemies,
            &mut rolls,
        );

        assert_eq!(result.outcome, AttackOutcome::Miss);
        assert!(result.per_target.is_empty());
        assert!(result.status_applied.is_empty());
        assert_eq!(enemies[0].current_health, 30.0);
        assert!(enemies[0].status.is_empty());
        assert_eq!(result.self_damage, 10.0);
        assert_eq!(player.current_health, 90.0);
    }

    #[test]
    fn double_edge_reduction_scales_recoil() {
        let attack = AttackDefinition::new("Reckless Swing", AttackKind::MeleeHit, 25.0)
            .with_double_edge(10.0);
        let mut player = player();
        player.modifiers.double_edge_reduction = 0.4;
        let mut enemies = slimes(1, 60.0);

        let result = resolve(
            &attack,
            CombatantId::PLAYER,
            &[CombatantId(1)],
            &mut player,
            &mut enemies,
            &mut steady(),
        );

        assert!((result.self_damage - 6.0).abs() < 1e-5);
        assert!((player.current_health - 94.0).abs() < 1e-5);
    }

    #[test]
    fn self_ko_is_rolled_before_accuracy() {
        let attack = AttackDefinition::new("Gamble", AttackKind::MeleeHit, 99.0).with_self_ko(0.5);
        let mut player = player();
        let mut enemies = slimes(1, 30.0);
        let mut rolls = ScriptedRolls::new(0.0).with(RollPurpose::SelfKnockout, [0.2]);

        let result = resolve(
            &attack,
            CombatantId::PLAYER,
            &[CombatantId(1)],
            &mut player,
            &mut enemies,
            &mut rolls,
        );

        assert_eq!(result.outcome, AttackOutcome::SelfKnockout);
        assert!(result.self_ko && result.attacker_died);
        assert_eq!(player.current_health, 0.0);
        assert_eq!(enemies[0].current_health, 30.0);
        assert_eq!(rolls.pending(RollPurpose::SelfKnockout), 0);
    }

    #[test]
    fn attacks_without_self_ko_never_draw_for_it() {
        let attack = AttackDefinition::new("Jab", AttackKind::MeleeHit, 5.0);
        let mut player = player();
        let mut enemies = slimes(1, 30.0);
        let mut rolls = ScriptedRolls::new(0.0).with(RollPurpose::SelfKnockout, [0.0]);

        let result = resolve(
            &attack,
            CombatantId::PLAYER,
            &[CombatantId(1)],
            &mut player,
            &mut enemies,
            &mut rolls,
        );

        assert!(!result.self_ko);
        assert_eq!(player.current_health, 100.0);
        assert_eq!(rolls.pending(RollPurpose::SelfKnockout), 1);
    }

    #[test]
    fn dead_targets_resolve_as_no_targets() {
        let attack = AttackDefinition::new("Cleave", AttackKind::MeleeHit, 10.0)
            .with_double_edge(4.0);
        let mut player = player();
        let mut enemies = slimes(1, 30.0);
        enemies[0].knock_out();
        let mut rolls = steady();

        let result = resolve(
            &attack,
            CombatantId::PLAYER,
            &[CombatantId(1)],
            &mut player,
            &mut enemies,
            &mut rolls,
        );

        assert_eq!(result.outcome, AttackOutcome::NoTargets);
        assert_eq!(result.self_damage, 4.0);
        assert_eq!(enemies[0].current_health, 0.0);
    }

    #[test]
    fn area_attacks_roll_crits_per_target() {
        let attack = AttackDefinition::new("Quake", AttackKind::AreaEffect, 10.0)
            .with_crit_chance(0.5);
        let mut player = player();
        let mut enemies = slimes(3, 30.0);
        let mut rolls = ScriptedRolls::new(0.0).with(RollPurpose::Critical, [0.9, 0.1, 0.9]);
        let targets: Vec<CombatantId> = enemies.iter().map(|e| e.id).collect();

        let result = resolve(
            &attack,
            CombatantId::PLAYER,
            &targets,
            &mut player,
            &mut enemies,
            &mut rolls,
        );

        let crits: Vec<bool> = result.per_target.iter().map(|t| t.is_crit).collect();
        assert_eq!(crits, [false, true, false]);
        assert_eq!(enemies[1].current_health, 10.0);
        assert_eq!(enemies[2].current_health, 20.0);
    }

    #[test]
    fn lifesteal_heals_from_damage_dealt() {
        let attack = AttackDefinition::new("Bite", AttackKind::MeleeHit, 20.0);
        let mut player = player();
        player.modifiers.lifesteal_percentage = 50.0;
        player.take_damage(30.0);
        let mut enemies = slimes(1, 50.0);
        enemies[0].add_shield(5.0);

        let result = resolve(
            &attack,
            CombatantId::PLAYER,
            &[CombatantId(1)],
            &mut player,
            &mut enemies,
            &mut steady(),
        );

        assert_eq!(result.lifesteal_heal, 10.0);
        assert_eq!(player.current_health, 80.0);
    }

    #[test]
    fn heals_are_capped_at_max_health() {
        let attack = AttackDefinition::new("Mend", AttackKind::Heal, 30.0);
        let mut player = player();
        player.take_damage(10.0);
        player.modifiers.healing_multiplier = 2.0;
        let mut enemies = slimes(1, 30.0);

        let result = resolve(
            &attack,
            CombatantId::PLAYER,
            &[],
            &mut player,
            &mut enemies,
            &mut steady(),
        );

        assert_eq!(result.per_target[0].target, CombatantId::PLAYER);
        assert_eq!(result.per_target[0].healed, 10.0);
        assert_eq!(player.current_health, 100.0);
        assert_eq!(enemies[0].current_health, 30.0);
    }

    #[test]
    fn ally_heals_pick_the_most_injured_enemy() {
        let attack = AttackDefinition::new("Dark Mend", AttackKind::Heal, 8.0)
            .with_heal_target(HealTarget::Ally);
        let mut player = player();
        let mut enemies = slimes(2, 30.0);
        enemies[1].take_damage(12.0);

        let result = resolve(
            &attack,
            CombatantId(1),
            &[CombatantId::PLAYER],
            &mut player,
            &mut enemies,
            &mut steady(),
        );

        assert_eq!(result.per_target[0].target, CombatantId(2));
        assert_eq!(enemies[1].current_health, 26.0);
        assert_eq!(player.current_health, 100.0);
    }

    #[test]
    fn debuffs_land_on_survivors_and_buffs_on_the_attacker() {
        let attack = AttackDefinition::new("Venom Strike", AttackKind::MeleeHit, 10.0)
            .with_targets(2)
            .with_status(StatusEffectSpec::debuff(StatusEffectKind::Poison, 2.0, 3))
            .with_status(StatusEffectSpec::buff(StatusEffectKind::Shielded, 6.0, 2));
        let mut player = player();
        let mut enemies = slimes(2, 30.0);
        enemies[1].current_health = 5.0;

        let result = resolve(
            &attack,
            CombatantId::PLAYER,
            &[CombatantId(1), CombatantId(2)],
            &mut player,
            &mut enemies,
            &mut steady(),
        );

        assert!(result.per_target[1].killed);
        assert!(enemies[0].status.has(StatusEffectKind::Poison));
        assert!(!enemies[1].status.has(StatusEffectKind::Poison));
        assert!(player.status.has(StatusEffectKind::Shielded));
        assert_eq!(player.shield, 6.0);
        assert_eq!(result.status_applied.len(), 2);
        assert_eq!(result.kills().collect::<Vec<_>>(), [CombatantId(2)]);
    }

    #[test]
    fn reapplying_a_shield_refreshes_instead_of_stacking() {
        let attack = AttackDefinition::new("Brace", AttackKind::MeleeHit, 1.0)
            .with_status(StatusEffectSpec::buff(StatusEffectKind::Shielded, 6.0, 2));
        let mut player = player();
        let mut enemies = slimes(1, 30.0);

        for _ in 0..2 {
            let result = resolve(
                &attack,
                CombatantId::PLAYER,
                &[CombatantId(1)],
                &mut player,
                &mut enemies,
                &mut steady(),
            );
            assert_eq!(result.outcome, AttackOutcome::Hit);
        }
        assert_eq!(player.shield, 6.0);
        assert_eq!(player.status.value(StatusEffectKind::Shielded), 6.0);

        player.take_damage(4.0);
        assert_eq!(player.shield, 2.0);

        let result = resolve(
            &attack,
            CombatantId::PLAYER,
            &[CombatantId(1)],
            &mut player,
            &mut enemies,
            &mut steady(),
        );
        assert!(result.status_applied.iter().all(|applied| applied.refreshed));
        assert_eq!(player.shield, 6.0);
    }
}
