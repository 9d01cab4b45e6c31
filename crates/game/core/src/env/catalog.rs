//! Attack and upgrade oracles.
//!
//! The catalog is static data keyed by archetype. Lookups are pure and stable:
//! the same archetype always yields the same ordered moveset, and position 0
//! is the archetype's starting attack.

use std::collections::BTreeMap;

use super::CatalogError;
use crate::attack::AttackDefinition;
use crate::progression::UpgradeDefinition;
use crate::state::ArchetypeId;

/// Oracle providing attack movesets per archetype.
pub trait AttackOracle: Send + Sync {
    /// Exact moveset lookup, without the `Default` fallback.
    fn moveset(&self, archetype: &ArchetypeId) -> Option<&[AttackDefinition]>;

    /// Every archetype with a registered moveset.
    fn archetypes(&self) -> Vec<ArchetypeId>;

    /// Like [`attacks_for`](Self::attacks_for) but reports unknown archetypes.
    fn try_attacks_for(
        &self,
        archetype: &ArchetypeId,
    ) -> Result<&[AttackDefinition], CatalogError> {
        self.moveset(archetype)
            .ok_or_else(|| CatalogError::UnknownArchetype(archetype.clone()))
    }

    /// Ordered moveset of an archetype. Unknown archetypes get the `Default`
    /// moveset; an empty slice only if `Default` is missing as well.
    fn attacks_for(&self, archetype: &ArchetypeId) -> &[AttackDefinition] {
        self.moveset(archetype)
            .or_else(|| self.moveset(&ArchetypeId::fallback()))
            .unwrap_or(&[])
    }

    fn find_by_name(
        &self,
        archetype: &ArchetypeId,
        name: &str,
    ) -> Result<&AttackDefinition, CatalogError> {
        self.attacks_for(archetype)
            .iter()
            .find(|attack| attack.name == name)
            .ok_or_else(|| CatalogError::AttackNotFound {
                archetype: archetype.clone(),
                name: name.to_owned(),
            })
    }

    /// Searches every moveset for an attack name.
    fn find_any(&self, name: &str) -> Option<&AttackDefinition> {
        self.archetypes().iter().find_map(|archetype| {
            self.moveset(archetype)
                .and_then(|attacks| attacks.iter().find(|attack| attack.name == name))
        })
    }
}

/// Oracle providing the upgrade pool.
pub trait UpgradeOracle: Send + Sync {
    fn upgrades(&self) -> &[UpgradeDefinition];

    fn find(&self, id: &str) -> Result<&UpgradeDefinition, CatalogError> {
        self.upgrades()
            .iter()
            .find(|upgrade| upgrade.id == id)
            .ok_or_else(|| CatalogError::UpgradeNotFound(id.to_owned()))
    }
}

/// In-memory catalog implementing both oracles.
#[derive(Clone, Debug, Default)]
pub struct StaticCatalog {
    movesets: BTreeMap<ArchetypeId, Vec<AttackDefinition>>,
    upgrades: Vec<UpgradeDefinition>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_moveset(
        mut self,
        archetype: impl Into<ArchetypeId>,
        attacks: Vec<AttackDefinition>,
    ) -> Self {
        self.insert_moveset(archetype, attacks);
        self
    }

    #[must_use]
    pub fn with_upgrade(mut self, upgrade: UpgradeDefinition) -> Self {
        self.upgrades.push(upgrade);
        self
    }

    pub fn insert_moveset(
        &mut self,
        archetype: impl Into<ArchetypeId>,
        attacks: Vec<AttackDefinition>,
    ) {
        self.movesets.insert(archetype.into(), attacks);
    }

    pub fn set_upgrades(&mut self, upgrades: Vec<UpgradeDefinition>) {
        self.upgrades = upgrades;
    }

    pub fn moveset_count(&self) -> usize {
        self.movesets.len()
    }

    /// Validates every attack definition and the uniqueness of upgrade ids.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for (archetype, attacks) in &self.movesets {
            if attacks.is_empty() {
                return Err(CatalogError::EmptyMoveset(archetype.clone()));
            }
            for attack in attacks {
                attack
                    .validate()
                    .map_err(|source| CatalogError::InvalidAttack {
                        archetype: archetype.clone(),
                        source,
                    })?;
            }
        }

        for (index, upgrade) in self.upgrades.iter().enumerate() {
            if self.upgrades[..index].iter().any(|u| u.id == upgrade.id) {
                return Err(CatalogError::DuplicateUpgrade(upgrade.id.clone()));
            }
        }

        Ok(())
    }
}

impl AttackOracle for StaticCatalog {
    fn moveset(&self, archetype: &ArchetypeId) -> Option<&[AttackDefinition]> {
        self.movesets.get(archetype).map(Vec::as_slice)
    }

    fn archetypes(&self) -> Vec<ArchetypeId> {
        self.movesets.keys().cloned().collect()
    }
}

impl UpgradeOracle for StaticCatalog {
    fn upgrades(&self) -> &[UpgradeDefinition] {
        &self.upgrades
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attack::AttackKind;
    use crate::progression::Rarity;

    fn catalog() -> StaticCatalog {
        StaticCatalog::new()
            .with_moveset(
                ArchetypeId::DEFAULT_NAME,
                vec![AttackDefinition::new("Strike", AttackKind::MeleeHit, 5.0)],
            )
            .with_moveset(
                "Brawler",
                vec![
                    AttackDefinition::new("Jab", AttackKind::MeleeHit, 8.0),
                    AttackDefinition::new("Haymaker", AttackKind::MeleeHit, 16.0).with_cooldown(2),
                ],
            )
            .with_upgrade(UpgradeDefinition::new("grit", "Grit", Rarity::Common))
    }

    #[test]
    fn movesets_are_ordered_and_stable() {
        let catalog = catalog();
        let brawler = ArchetypeId::new("Brawler");
        let names = |catalog: &StaticCatalog| -> Vec<String> {
            catalog
                .attacks_for(&brawler)
                .iter()
                .map(|a| a.name.clone())
                .collect()
        };
        let first = names(&catalog);
        let second = names(&catalog);
        assert_eq!(first, ["Jab", "Haymaker"]);
        assert_eq!(first, second);
    }

    #[test]
    fn unknown_archetype_falls_back_to_default() {
        let catalog = catalog();
        let mimic = ArchetypeId::new("Mimic");

        let attacks = catalog.attacks_for(&mimic);
        assert_eq!(attacks.len(), 1);
        assert_eq!(attacks[0].name, "Strike");

        assert_eq!(
            catalog.try_attacks_for(&mimic).unwrap_err(),
            CatalogError::UnknownArchetype(mimic.clone())
        );
        assert!(catalog.find_by_name(&mimic, "Strike").is_ok());
    }

    #[test]
    fn find_by_name_reports_missing_attacks() {
        let catalog = catalog();
        let err = catalog
            .find_by_name(&ArchetypeId::new("Brawler"), "Fireball")
            .unwrap_err();
        assert!(matches!(err, CatalogError::AttackNotFound { .. }));
        assert_eq!(catalog.find_any("Haymaker").map(|a| a.max_cooldown), Some(2));
        assert!(catalog.find_any("Fireball").is_none());
    }

    #[test]
    fn upgrades_are_found_by_id() {
        let catalog = catalog();
        assert_eq!(catalog.find("grit").unwrap().name, "Grit");
        assert_eq!(
            catalog.find("nope").unwrap_err(),
            CatalogError::UpgradeNotFound("nope".into())
        );
    }

    #[test]
    fn validate_catches_bad_data() {
        assert_eq!(catalog().validate(), Ok(()));

        let bad = catalog().with_moveset(
            "Goblin",
            vec![AttackDefinition::new("Stab", AttackKind::MeleeHit, 4.0).with_accuracy(2.0)],
        );
        assert!(matches!(bad.validate(), Err(CatalogError::InvalidAttack { .. })));

        let dup = catalog().with_upgrade(UpgradeDefinition::new("grit", "Grit", Rarity::Rare));
        assert_eq!(
            dup.validate(),
            Err(CatalogError::DuplicateUpgrade("grit".into()))
        );
    }
}
