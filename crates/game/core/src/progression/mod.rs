//! Wave progression and the upgrade economy of a run.
//!
//! Waves scale enemy health geometrically. Clearing a wave yields a
//! rarity-weighted offer of upgrades; chosen upgrades are permanent for the
//! rest of the run and are tracked in an [`UpgradeLedger`].

mod offer;
mod unlock;
mod upgrade;
mod wave;

pub use offer::{OfferContext, RarityCurve, RarityWeights, generate_offers};
pub use unlock::{Loadout, UnlockMode};
pub use upgrade::{
    AppliedUpgrade, AttackUnlock, Rarity, UpgradeDefinition, UpgradeEffect, UpgradeLedger,
    apply_upgrade,
};
pub use wave::{WaveState, enemy_count, scaled_health, spawn_wave};
