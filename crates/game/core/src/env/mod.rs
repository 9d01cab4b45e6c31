//! Read-only battle data and randomness.
//!
//! Oracles expose the attack catalog and the upgrade pool. The [`BattleEnv`]
//! aggregate bundles them so the engine can reach everything it needs without
//! coupling to a concrete loader.
mod catalog;
mod error;
mod rng;

pub use catalog::{AttackOracle, StaticCatalog, UpgradeOracle};
pub use error::CatalogError;
pub use rng::{
    PcgRng, RngOracle, RollPurpose, RollSource, ScriptedRolls, SeededRolls, compute_seed,
};

/// Aggregates the read-only oracles required by the engine.
#[derive(Clone, Copy)]
pub struct BattleEnv<'a> {
    attacks: &'a dyn AttackOracle,
    upgrades: &'a dyn UpgradeOracle,
}

impl<'a> BattleEnv<'a> {
    pub fn new(attacks: &'a dyn AttackOracle, upgrades: &'a dyn UpgradeOracle) -> Self {
        Self { attacks, upgrades }
    }

    /// Uses one catalog for both oracles.
    pub fn from_catalog<C>(catalog: &'a C) -> Self
    where
        C: AttackOracle + UpgradeOracle,
    {
        Self::new(catalog, catalog)
    }

    pub fn attacks(&self) -> &'a dyn AttackOracle {
        self.attacks
    }

    pub fn upgrades(&self) -> &'a dyn UpgradeOracle {
        self.upgrades
    }
}

impl core::fmt::Debug for BattleEnv<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BattleEnv")
            .field("archetypes", &self.attacks.archetypes())
            .field("upgrades", &self.upgrades.upgrades().len())
            .finish()
    }
}
