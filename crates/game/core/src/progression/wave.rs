//! Enemy spawning and per-wave scaling.

use crate::config::WaveConfig;
use crate::env::{RollPurpose, RollSource};
use crate::state::{ArchetypeId, Combatant, CombatantId};

/// The wave currently being fought.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WaveState {
    /// 1-based wave index.
    pub number: u32,
    /// Max health of every enemy spawned this wave.
    pub enemy_health: f32,
    pub spawned: u32,
}

/// Enemy health at a 1-based wave: `base × multiplier^(wave-1)`.
pub fn scaled_health(base: f32, multiplier: f32, wave: u32) -> f32 {
    let exponent = i32::try_from(wave.saturating_sub(1)).unwrap_or(i32::MAX);
    (base * multiplier.powi(exponent)).max(0.0)
}

/// Number of enemies in a wave: 1–2 early on, 2–4 from wave 4, never more
/// than `spawn_slots`.
pub fn enemy_count(wave: u32, spawn_slots: u32, rolls: &mut dyn RollSource) -> u32 {
    let (min, max) = if wave <= 3 { (1, 2) } else { (2, 4) };
    let slots = spawn_slots.max(1);
    rolls.range(RollPurpose::EnemyCount, min.min(slots), max.min(slots))
}

/// Spawns the enemies of `wave`, numbering them from `first_id`.
pub fn spawn_wave(
    wave: u32,
    config: &WaveConfig,
    first_id: u32,
    rolls: &mut dyn RollSource,
) -> (WaveState, Vec<Combatant>) {
    let count = enemy_count(wave, config.spawn_slots, rolls);
    let health = scaled_health(config.enemy_max_health, config.health_multiplier, wave);

    let enemies = (0..count)
        .map(|offset| {
            let archetype = if config.enemy_pool.is_empty() {
                ArchetypeId::fallback()
            } else {
                let index = rolls.index(RollPurpose::EnemyArchetype, config.enemy_pool.len());
                config.enemy_pool[index].clone()
            };
            Combatant::enemy(CombatantId(first_id + offset), archetype, health)
        })
        .collect();

    let state = WaveState {
        number: wave,
        enemy_health: health,
        spawned: count,
    };
    (state, enemies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::SeededRolls;

    #[test]
    fn health_scales_geometrically() {
        assert_eq!(scaled_health(30.0, 1.1, 1), 30.0);
        assert!((scaled_health(30.0, 1.1, 3) - 36.3).abs() < 1e-3);
    }

    #[test]
    fn enemy_counts_follow_wave_brackets() {
        let mut rolls = SeededRolls::new(3);
        for _ in 0..64 {
            let early = enemy_count(2, 4, &mut rolls);
            assert!((1..=2).contains(&early));
            let late = enemy_count(5, 4, &mut rolls);
            assert!((2..=4).contains(&late));
        }
    }

    #[test]
    fn spawn_slots_bound_the_count() {
        let mut rolls = SeededRolls::new(11);
        for _ in 0..32 {
            assert_eq!(enemy_count(7, 1, &mut rolls), 1);
            assert!(enemy_count(7, 3, &mut rolls) <= 3);
        }
    }

    #[test]
    fn spawned_enemies_share_the_wave_health_and_draw_from_the_pool() {
        let config = WaveConfig::new()
            .with_enemy_health(30.0, 1.1)
            .with_enemy_pool(["Slime", "Goblin"]);
        let mut rolls = SeededRolls::new(5);
        let (state, enemies) = spawn_wave(3, &config, 7, &mut rolls);

        assert_eq!(state.number, 3);
        assert_eq!(state.spawned as usize, enemies.len());
        for (offset, enemy) in enemies.iter().enumerate() {
            assert_eq!(enemy.id, CombatantId(7 + offset as u32));
            assert!((enemy.max_health - 36.3).abs() < 1e-3);
            assert!(["Slime", "Goblin"].contains(&enemy.archetype.as_str()));
        }
    }

    #[test]
    fn empty_pool_spawns_default_enemies() {
        let config = WaveConfig::new();
        let (_, enemies) = spawn_wave(1, &config, 1, &mut SeededRolls::new(1));
        assert!(enemies.iter().all(|e| e.archetype.is_fallback()));
    }
}
