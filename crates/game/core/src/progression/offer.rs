//! Rarity-weighted upgrade offers.

use super::unlock::Loadout;
use super::upgrade::{Rarity, UpgradeDefinition, UpgradeLedger};
use crate::attack::AttackDefinition;
use crate::env::{RollPurpose, RollSource};

/// Linear weight of one rarity tier over the waves of a run.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RarityCurve {
    /// Weight at wave 1.
    pub base: f32,
    /// Added per wave after the first; may be negative.
    pub per_wave: f32,
}

impl RarityCurve {
    pub const fn new(base: f32, per_wave: f32) -> Self {
        Self { base, per_wave }
    }

    /// Weight at a 1-based wave, floored at 0.
    pub fn weight_at(&self, wave: u32) -> f32 {
        (self.base + self.per_wave * wave.saturating_sub(1) as f32).max(0.0)
    }
}

/// One curve per rarity tier.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RarityWeights {
    pub common: RarityCurve,
    pub rare: RarityCurve,
    pub epic: RarityCurve,
    pub legendary: RarityCurve,
}

impl Default for RarityWeights {
    fn default() -> Self {
        Self {
            common: RarityCurve::new(60.0, -4.0),
            rare: RarityCurve::new(28.0, 2.0),
            epic: RarityCurve::new(10.0, 1.5),
            legendary: RarityCurve::new(2.0, 0.5),
        }
    }
}

impl RarityWeights {
    pub fn curve(&self, rarity: Rarity) -> RarityCurve {
        match rarity {
            Rarity::Common => self.common,
            Rarity::Rare => self.rare,
            Rarity::Epic => self.epic,
            Rarity::Legendary => self.legendary,
        }
    }

    pub fn weights_at(&self, wave: u32) -> [(Rarity, f32); 4] {
        [Rarity::Common, Rarity::Rare, Rarity::Epic, Rarity::Legendary]
            .map(|rarity| (rarity, self.curve(rarity).weight_at(wave)))
    }

    /// Draws a rarity tier for one offer slot. All-zero weights yield `Common`.
    pub fn roll(&self, wave: u32, rolls: &mut dyn RollSource) -> Rarity {
        let weights = self.weights_at(wave);
        let total: f32 = weights.iter().map(|(_, weight)| weight).sum();
        if total <= 0.0 {
            return Rarity::Common;
        }

        let mut draw = rolls.unit(RollPurpose::UpgradeRarity) * total;
        let mut picked = Rarity::Common;
        for (rarity, weight) in weights {
            if weight <= 0.0 {
                continue;
            }
            picked = rarity;
            if draw < weight {
                break;
            }
            draw -= weight;
        }
        picked
    }
}

/// Run state that decides which upgrades may be offered.
#[derive(Clone, Copy, Debug)]
pub struct OfferContext<'a> {
    pub ledger: &'a UpgradeLedger,
    pub loadout: &'a Loadout,
    pub moveset: &'a [AttackDefinition],
    pub wave: u32,
}

impl OfferContext<'_> {
    /// Below its stack limit, and for unlock upgrades something is left to unlock.
    pub fn is_eligible(&self, upgrade: &UpgradeDefinition) -> bool {
        self.ledger.can_take(upgrade)
            && upgrade
                .unlocks
                .as_ref()
                .is_none_or(|unlock| self.loadout.can_unlock(unlock, self.moveset))
    }
}

/// Builds up to `count` distinct offers from the eligible part of `pool`.
///
/// Each slot draws a rarity; an empty tier falls back to progressively more
/// common tiers and finally to any remaining eligible upgrade.
pub fn generate_offers(
    pool: &[UpgradeDefinition],
    context: &OfferContext<'_>,
    count: u32,
    weights: &RarityWeights,
    rolls: &mut dyn RollSource,
) -> Vec<UpgradeDefinition> {
    let mut remaining: Vec<&UpgradeDefinition> =
        pool.iter().filter(|upgrade| context.is_eligible(upgrade)).collect();
    let mut offers = Vec::new();

    while offers.len() < count as usize && !remaining.is_empty() {
        let wanted = weights.roll(context.wave, rolls);
        let candidates: Vec<usize> = match available_tier(&remaining, wanted) {
            Some(tier) => remaining
                .iter()
                .enumerate()
                .filter(|(_, upgrade)| upgrade.rarity == tier)
                .map(|(index, _)| index)
                .collect(),
            None => (0..remaining.len()).collect(),
        };

        let pick = candidates[rolls.index(RollPurpose::UpgradePick, candidates.len())];
        offers.push(remaining.remove(pick).clone());
    }

    offers
}

fn available_tier(remaining: &[&UpgradeDefinition], wanted: Rarity) -> Option<Rarity> {
    let mut tier = Some(wanted);
    while let Some(rarity) = tier {
        if remaining.iter().any(|upgrade| upgrade.rarity == rarity) {
            return Some(rarity);
        }
        tier = rarity.lower();
    }
    None
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::attack::AttackKind;
    use crate::env::SeededRolls;
    use crate::progression::AttackUnlock;

    struct Fixed(f32);

    impl RollSource for Fixed {
        fn unit(&mut self, _purpose: RollPurpose) -> f32 {
            self.0
        }
    }

    fn pool() -> Vec<UpgradeDefinition> {
        vec![
            UpgradeDefinition::new("c1", "Whetstone", Rarity::Common).stackable(Some(3)),
            UpgradeDefinition::new("c2", "Bandage", Rarity::Common),
            UpgradeDefinition::new("c3", "Boots", Rarity::Common),
            UpgradeDefinition::new("r1", "Focus", Rarity::Rare),
            UpgradeDefinition::new("e1", "Vampiric Edge", Rarity::Epic).unique(),
        ]
    }

    fn moveset() -> Vec<AttackDefinition> {
        vec![
            AttackDefinition::new("Jab", AttackKind::MeleeHit, 8.0),
            AttackDefinition::new("Hook", AttackKind::MeleeHit, 12.0),
        ]
    }

    #[test]
    fn curves_shift_weight_towards_rarer_tiers() {
        let weights = RarityWeights::default();
        let wave1 = weights.weights_at(1);
        let wave6 = weights.weights_at(6);
        assert_eq!(wave1[0], (Rarity::Common, 60.0));
        assert_eq!(wave6[0], (Rarity::Common, 40.0));
        assert_eq!(wave6[3], (Rarity::Legendary, 4.5));

        let steep = RarityCurve::new(10.0, -5.0);
        assert_eq!(steep.weight_at(10), 0.0);
    }

    #[test]
    fn roll_maps_draws_onto_cumulative_weights() {
        let weights = RarityWeights::default();
        // wave 1 total = 100
        assert_eq!(weights.roll(1, &mut Fixed(0.0)), Rarity::Common);
        assert_eq!(weights.roll(1, &mut Fixed(0.61)), Rarity::Rare);
        assert_eq!(weights.roll(1, &mut Fixed(0.90)), Rarity::Epic);
        assert_eq!(weights.roll(1, &mut Fixed(0.99)), Rarity::Legendary);
    }

    #[test]
    fn offers_have_no_duplicates_and_respect_count() {
        let pool = pool();
        let moveset = moveset();
        let ledger = UpgradeLedger::new();
        let loadout = Loadout::full(&moveset);
        let context = OfferContext {
            ledger: &ledger,
            loadout: &loadout,
            moveset: &moveset,
            wave: 2,
        };

        for seed in 0..32 {
            let mut rolls = SeededRolls::new(seed);
            let offers = generate_offers(&pool, &context, 3, &RarityWeights::default(), &mut rolls);
            assert_eq!(offers.len(), 3);
            let ids: HashSet<&str> = offers.iter().map(|u| u.id.as_str()).collect();
            assert_eq!(ids.len(), 3);
        }
    }

    #[test]
    fn empty_tiers_fall_back_to_more_common_ones() {
        let pool = pool();
        let moveset = moveset();
        let ledger = UpgradeLedger::new();
        let loadout = Loadout::full(&moveset);
        let context = OfferContext {
            ledger: &ledger,
            loadout: &loadout,
            moveset: &moveset,
            wave: 1,
        };

        // Always rolls Legendary; none exist so Epic is used first, then Rare, then Common.
        let offers = generate_offers(
            &pool,
            &context,
            3,
            &RarityWeights::default(),
            &mut Fixed(0.999),
        );
        let rarities: Vec<Rarity> = offers.iter().map(|u| u.rarity).collect();
        assert_eq!(rarities, [Rarity::Epic, Rarity::Rare, Rarity::Common]);
    }

    #[test]
    fn capped_and_unique_upgrades_stop_being_offered() {
        let pool = pool();
        let moveset = moveset();
        let mut ledger = UpgradeLedger::new();
        for _ in 0..3 {
            ledger.record("c1");
        }
        ledger.record("e1");
        let loadout = Loadout::full(&moveset);
        let context = OfferContext {
            ledger: &ledger,
            loadout: &loadout,
            moveset: &moveset,
            wave: 4,
        };

        for seed in 0..32 {
            let offers = generate_offers(
                &pool,
                &context,
                5,
                &RarityWeights::default(),
                &mut SeededRolls::new(seed),
            );
            assert_eq!(offers.len(), 3);
            assert!(offers.iter().all(|u| u.id != "c1" && u.id != "e1"));
        }
    }

    #[test]
    fn unlock_upgrades_need_a_locked_attack() {
        let moveset = moveset();
        let pool = vec![
            UpgradeDefinition::new("learn", "Learn", Rarity::Common)
                .with_unlock(AttackUnlock::Next),
        ];
        let ledger = UpgradeLedger::new();

        let full = Loadout::full(&moveset);
        let context = OfferContext {
            ledger: &ledger,
            loadout: &full,
            moveset: &moveset,
            wave: 1,
        };
        let offers =
            generate_offers(&pool, &context, 3, &RarityWeights::default(), &mut Fixed(0.0));
        assert!(offers.is_empty());

        let starting = Loadout::starting(&moveset);
        let context = OfferContext {
            loadout: &starting,
            ..context
        };
        assert_eq!(
            generate_offers(&pool, &context, 3, &RarityWeights::default(), &mut Fixed(0.0)).len(),
            1
        );
    }
}
