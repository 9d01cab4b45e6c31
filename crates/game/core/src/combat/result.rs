//! Combat result types and attack resolution.

use crate::attack::{AttackDefinition, HealTarget, StatusEffectSpec};
use crate::env::{RollPurpose, RollSource};
use crate::state::{CombatantId, StatusEffectKind};

use super::Participants;
use super::damage::{
    calculate_damage, heal_amount, lifesteal_amount, outgoing_damage, recoil_damage,
};
use super::hit::{check_crit, check_hit, check_self_ko, effective_accuracy, effective_crit_chance};

/// Rule parameters the resolver needs from the battle configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CombatParams {
    pub crit_multiplier: f32,
}

impl Default for CombatParams {
    fn default() -> Self {
        Self {
            crit_multiplier: 2.0,
        }
    }
}

/// How a resolution ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackOutcome {
    /// The attack connected with its targets.
    Hit,
    /// The accuracy roll failed.
    Miss,
    /// The attacker knocked itself out before attacking.
    SelfKnockout,
    /// Every target was already dead.
    NoTargets,
}

/// Effect of a resolution on one target.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetOutcome {
    pub target: CombatantId,
    /// Health removed (after the shield).
    pub damage: f32,
    /// Damage soaked by the shield.
    pub absorbed: f32,
    pub healed: f32,
    pub is_crit: bool,
    /// The target died from this resolution.
    pub killed: bool,
}

/// A status effect landed by a resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AppliedStatus {
    pub target: CombatantId,
    pub kind: StatusEffectKind,
    pub value: f32,
    pub duration: u32,
    /// An active instance was refreshed instead of added.
    pub refreshed: bool,
}

/// Complete result of one attack resolution.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolutionResult {
    pub attacker: CombatantId,
    pub attack: String,
    pub sound_cue: Option<String>,
    pub outcome: AttackOutcome,
    /// At least one target was critically hit.
    pub is_crit: bool,
    pub per_target: Vec<TargetOutcome>,
    /// Double-edge damage the attacker took.
    pub self_damage: f32,
    pub self_ko: bool,
    pub lifesteal_heal: f32,
    pub status_applied: Vec<AppliedStatus>,
    /// The attacker is dead after the resolution (self-KO or recoil).
    pub attacker_died: bool,
}

impl ResolutionResult {
    fn new(attacker: CombatantId, attack: &AttackDefinition, outcome: AttackOutcome) -> Self {
        Self {
            attacker,
            attack: attack.name.clone(),
            sound_cue: attack.sound_cue.clone(),
            outcome,
            is_crit: false,
            per_target: Vec::new(),
            self_damage: 0.0,
            self_ko: false,
            lifesteal_heal: 0.0,
            status_applied: Vec::new(),
            attacker_died: false,
        }
    }

    pub fn hit(&self) -> bool {
        self.outcome == AttackOutcome::Hit
    }

    /// Damage dealt to targets, shield absorption included.
    pub fn total_damage(&self) -> f32 {
        self.per_target.iter().map(|t| t.damage + t.absorbed).sum()
    }

    pub fn total_healing(&self) -> f32 {
        self.per_target.iter().map(|t| t.healed).sum::<f32>() + self.lifesteal_heal
    }

    /// Targets killed by this resolution.
    pub fn kills(&self) -> impl Iterator<Item = CombatantId> + '_ {
        self.per_target.iter().filter(|t| t.killed).map(|t| t.target)
    }
}

/// Resolves one attack of `attacker` against `targets`.
///
/// # Order
///
/// 1. self-KO roll (only for attacks that can self-KO); a failure ends here
/// 2. no living target: double-edge applies, nothing else
/// 3. accuracy roll; a miss still applies double-edge
/// 4. per-target damage with an independent crit roll, or healing
/// 5. double-edge recoil
/// 6. lifesteal from damage dealt
/// 7. debuffs on surviving hit targets, buffs on the attacker
///
/// Heal attacks ignore `targets` and pick their recipient from
/// [`HealTarget`].
pub fn resolve_attack(
    attack: &AttackDefinition,
    attacker_id: CombatantId,
    targets: &[CombatantId],
    field: &mut Participants<'_>,
    rolls: &mut dyn RollSource,
    params: CombatParams,
) -> ResolutionResult {
    let Some(attacker) = field.get(attacker_id) else {
        debug_assert!(false, "attacker {attacker_id} is not on the field");
        return ResolutionResult::new(attacker_id, attack, AttackOutcome::NoTargets);
    };
    let modifiers = attacker.modifiers.clone();
    let outgoing = outgoing_damage(attack, &modifiers, &attacker.status);

    // 1. self-KO
    if attack.can_self_ko && check_self_ko(attack, rolls.unit(RollPurpose::SelfKnockout)) {
        let mut result = ResolutionResult::new(attacker_id, attack, AttackOutcome::SelfKnockout);
        if let Some(attacker) = field.get_mut(attacker_id) {
            attacker.knock_out();
        }
        result.self_ko = true;
        result.attacker_died = true;
        return result;
    }

    // 2. recipients
    let recipients: Vec<CombatantId> = if attack.is_heal() {
        match attack.heal_target {
            HealTarget::User => vec![attacker_id],
            HealTarget::Ally => field.most_injured_ally(attacker_id).into_iter().collect(),
        }
    } else {
        targets
            .iter()
            .copied()
            .filter(|id| field.is_alive(*id))
            .collect()
    };

    if recipients.is_empty() {
        let mut result = ResolutionResult::new(attacker_id, attack, AttackOutcome::NoTargets);
        apply_recoil(attack, attacker_id, field, &mut result);
        return result;
    }

    // 3. accuracy
    if !check_hit(
        effective_accuracy(attack, &modifiers),
        rolls.unit(RollPurpose::Accuracy),
    ) {
        let mut result = ResolutionResult::new(attacker_id, attack, AttackOutcome::Miss);
        apply_recoil(attack, attacker_id, field, &mut result);
        return result;
    }

    let mut result = ResolutionResult::new(attacker_id, attack, AttackOutcome::Hit);

    // 4. per target
    let crit_chance = effective_crit_chance(attack, &modifiers);
    let mut dealt = 0.0;
    for id in &recipients {
        let Some(target) = field.get_mut(*id) else {
            continue;
        };

        if attack.is_heal() {
            let healed = target.heal(heal_amount(attack, &modifiers));
            result.per_target.push(TargetOutcome {
                target: *id,
                damage: 0.0,
                absorbed: 0.0,
                healed,
                is_crit: false,
                killed: false,
            });
            continue;
        }

        let is_crit = check_crit(crit_chance, rolls.unit(RollPurpose::Critical));
        let amount = calculate_damage(outgoing, &target.status, is_crit, params.crit_multiplier);
        let taken = target.take_damage(amount);
        dealt += taken.total();
        result.is_crit |= is_crit;
        result.per_target.push(TargetOutcome {
            target: *id,
            damage: taken.health_lost,
            absorbed: taken.absorbed,
            healed: 0.0,
            is_crit,
            killed: !target.is_alive(),
        });
    }

    // 5. double-edge
    apply_recoil(attack, attacker_id, field, &mut result);

    // 6. lifesteal
    let steal = lifesteal_amount(dealt, &modifiers);
    if steal > 0.0
        && let Some(attacker) = field.get_mut(attacker_id)
    {
        result.lifesteal_heal = attacker.heal(steal);
    }

    // 7. status effects
    for spec in &attack.status_effects {
        if spec.is_buff {
            apply_status(spec, attacker_id, field, &mut result);
        } else if !attack.is_heal() {
            for id in &recipients {
                apply_status(spec, *id, field, &mut result);
            }
        }
    }

    debug_assert!(
        recipients
            .iter()
            .chain(core::iter::once(&attacker_id))
            .filter_map(|id| field.get(*id))
            .all(|c| c.invariants_hold()),
        "combatant invariants violated after resolving {}",
        attack.name
    );

    result
}

fn apply_recoil(
    attack: &AttackDefinition,
    attacker_id: CombatantId,
    field: &mut Participants<'_>,
    result: &mut ResolutionResult,
) {
    let Some(attacker) = field.get_mut(attacker_id) else {
        return;
    };
    let recoil = recoil_damage(attack, &attacker.modifiers);
    if recoil > 0.0 {
        result.self_damage = attacker.lose_health(recoil);
    }
    result.attacker_died = !attacker.is_alive();
}

fn apply_status(
    spec: &StatusEffectSpec,
    target: CombatantId,
    field: &mut Participants<'_>,
    result: &mut ResolutionResult,
) {
    let Some(combatant) = field.get_mut(target) else {
        return;
    };
    if !combatant.is_alive() || spec.duration == 0 {
        return;
    }

    let refreshed = combatant.status.apply(spec.kind, spec.value, spec.duration);
    if spec.kind == StatusEffectKind::Shielded {
        if refreshed {
            combatant.top_up_shield(spec.value);
        } else {
            combatant.add_shield(spec.value);
        }
    }
    result.status_applied.push(AppliedStatus {
        target,
        kind: spec.kind,
        value: combatant.status.value(spec.kind),
        duration: spec.duration,
        refreshed,
    });
}
