//! Target selection for player attacks.
//!
//! Enemies always strike the player, so only the player side needs to map an
//! attack's arity onto the current wave.

use super::AttackDefinition;
use crate::state::Combatant;

/// Why a requested target set could not be built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TargetingError {
    #[error("target index {index} is out of range or already defeated")]
    InvalidTarget { index: usize },

    #[error("attack needs an explicit target while {alive} enemies are alive")]
    TargetRequired { alive: usize },
}

/// Resolves which enemies (by wave index) an attack will hit.
///
/// - Heals never target enemies (empty selection).
/// - Area attacks, and attacks whose target count covers every living enemy,
///   hit all alive enemies in spawn order.
/// - Otherwise the primary target comes first, followed by the next living
///   enemies in spawn order until `number_of_targets` is reached.
///
/// An explicit `primary` is always validated, even for area attacks. When no
/// enemy is alive the selection is empty and the attack resolves as a no-op.
pub fn select_targets(
    attack: &AttackDefinition,
    enemies: &[Combatant],
    primary: Option<usize>,
) -> Result<Vec<usize>, TargetingError> {
    if let Some(index) = primary
        && !enemies.get(index).is_some_and(Combatant::is_alive)
    {
        return Err(TargetingError::InvalidTarget { index });
    }

    if attack.is_heal() {
        return Ok(Vec::new());
    }

    let alive: Vec<usize> = enemies
        .iter()
        .enumerate()
        .filter(|(_, enemy)| enemy.is_alive())
        .map(|(index, _)| index)
        .collect();

    if alive.is_empty() {
        return Ok(alive);
    }

    let wanted = attack.number_of_targets as usize;
    if attack.targets_all() || (primary.is_none() && wanted >= alive.len()) {
        return Ok(alive);
    }

    let primary = match primary {
        Some(index) => index,
        None if alive.len() == 1 => alive[0],
        None => return Err(TargetingError::TargetRequired { alive: alive.len() }),
    };

    let mut selected = Vec::with_capacity(wanted.min(alive.len()));
    selected.push(primary);
    selected.extend(
        alive
            .iter()
            .copied()
            .filter(|&index| index != primary)
            .take(wanted.saturating_sub(1)),
    );
    Ok(selected)
}
