//! Plain-text rendering of battle views and events.
use battle_core::{
    AttackOutcome, AvailableAttack, BattleEvent, BattleStateView, CombatantId, RunStats,
    UpgradeDefinition,
};

fn name(id: CombatantId) -> String {
    if id.is_player() {
        "You".to_owned()
    } else {
        format!("Enemy #{}", id.0)
    }
}

pub fn status_line(view: &BattleStateView) -> String {
    let mut line = format!(
        "Wave {} | HP {:.0}/{:.0}",
        view.wave, view.player_health, view.player_max_health
    );
    if view.player_shield > 0.0 {
        line.push_str(&format!(" (+{:.0} shield)", view.player_shield));
    }
    for (index, enemy) in view.enemies.iter().enumerate() {
        if enemy.alive {
            line.push_str(&format!(
                " | [{index}] {} {:.0}/{:.0}",
                enemy.archetype, enemy.health, enemy.max_health
            ));
        }
    }
    line
}

pub fn attack_menu(attacks: &[AvailableAttack]) -> Vec<String> {
    attacks
        .iter()
        .enumerate()
        .map(|(index, available)| {
            let attack = &available.attack;
            let cooldown = if available.is_ready() {
                String::new()
            } else {
                format!(" (cooldown {})", available.cooldown_remaining)
            };
            format!(
                "{}) {} [{}, {:.0}]{cooldown}",
                index + 1,
                attack.name,
                attack.kind,
                attack.base_damage
            )
        })
        .collect()
}

pub fn offer_menu(offers: &[UpgradeDefinition]) -> Vec<String> {
    offers
        .iter()
        .enumerate()
        .map(|(index, upgrade)| format!("{}) {} ({})", index + 1, upgrade.name, upgrade.rarity))
        .collect()
}

/// One line per event worth telling the player about.
pub fn describe(event: &BattleEvent) -> Option<String> {
    let line = match event {
        BattleEvent::WaveStarted { wave, enemies, .. } => {
            format!("Wave {wave} begins: {} enemies appear.", enemies.len())
        }
        BattleEvent::AttackUsed {
            attacker,
            attack,
            outcome,
            ..
        } => match outcome {
            AttackOutcome::Miss => format!("{} used {attack}, but missed.", name(*attacker)),
            AttackOutcome::SelfKnockout => {
                format!("{} used {attack} and collapsed!", name(*attacker))
            }
            _ => format!("{} used {attack}.", name(*attacker)),
        },
        BattleEvent::Damaged {
            target,
            amount,
            is_crit,
            ..
        } => {
            let crit = if *is_crit { " Critical hit!" } else { "" };
            format!("{} took {amount:.0} damage.{crit}", name(*target))
        }
        BattleEvent::Healed { target, amount } => format!("{} healed {amount:.0}.", name(*target)),
        BattleEvent::Recoil { attacker, amount } => {
            format!("{} took {amount:.0} recoil damage.", name(*attacker))
        }
        BattleEvent::StatusApplied { target, kind, duration } => {
            format!("{} is affected by {kind} for {duration} turn(s).", name(*target))
        }
        BattleEvent::StatusTicked {
            target,
            damage,
            healing,
        } => match (*damage > 0.0, *healing > 0.0) {
            (true, _) => format!("{} suffers {damage:.0} over time.", name(*target)),
            _ => format!("{} recovers {healing:.0}.", name(*target)),
        },
        BattleEvent::TurnSkipped { combatant, reason } => {
            format!("{} skipped a turn ({reason}).", name(*combatant))
        }
        BattleEvent::Defeated { combatant } => format!("{} fell.", name(*combatant)),
        BattleEvent::WaveCleared { wave } => format!("Wave {wave} cleared!"),
        BattleEvent::AttackUnlocked { attack } => format!("New attack unlocked: {attack}."),
        BattleEvent::UpgradeChosen { id } => format!("Upgrade taken: {id}."),
        BattleEvent::Victory { .. } => "Victory!".to_owned(),
        BattleEvent::Defeat { .. } => "Defeat.".to_owned(),
        BattleEvent::SelfKnockout { .. }
        | BattleEvent::StatusExpired { .. }
        | BattleEvent::UpgradesOffered { .. }
        | BattleEvent::UpgradeSkipped => return None,
    };
    Some(line)
}

pub fn summary(stats: &RunStats) -> String {
    format!(
        "Waves cleared: {} | Rounds: {} | Enemies defeated: {} | Damage dealt: {:.0} | Damage taken: {:.0}",
        stats.waves_cleared,
        stats.rounds,
        stats.enemies_defeated,
        stats.damage_dealt,
        stats.damage_taken
    )
}
