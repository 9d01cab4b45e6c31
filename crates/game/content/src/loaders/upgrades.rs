//! Upgrade pool loader.

use std::path::Path;

use anyhow::{Context, bail};
use battle_core::UpgradeDefinition;

use crate::loaders::{LoadResult, read_file};

/// Loader for the upgrade pool from RON files.
///
/// File format: `[UpgradeDefinition, ...]`
pub struct UpgradeLoader;

impl UpgradeLoader {
    /// Upgrade pool embedded in the crate.
    pub const EMBEDDED: &'static str = include_str!("../../data/upgrades.ron");

    pub fn load(path: &Path) -> LoadResult<Vec<UpgradeDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    /// Parses RON upgrade text, rejecting duplicate ids.
    pub fn parse(content: &str) -> LoadResult<Vec<UpgradeDefinition>> {
        let upgrades: Vec<UpgradeDefinition> =
            ron::from_str(content).context("Failed to parse upgrade RON")?;

        for (index, upgrade) in upgrades.iter().enumerate() {
            if upgrades[..index].iter().any(|u| u.id == upgrade.id) {
                bail!("duplicate upgrade id '{}'", upgrade.id);
            }
        }

        Ok(upgrades)
    }

    pub fn embedded() -> LoadResult<Vec<UpgradeDefinition>> {
        Self::parse(Self::EMBEDDED)
    }
}

#[cfg(test)]
mod tests {
    use battle_core::{AttackUnlock, Rarity, UpgradeEffect};

    use super::*;

    #[test]
    fn embedded_pool_spans_every_rarity() {
        let upgrades = UpgradeLoader::embedded().unwrap();
        for rarity in [Rarity::Common, Rarity::Rare, Rarity::Epic, Rarity::Legendary] {
            assert!(upgrades.iter().any(|u| u.rarity == rarity), "no {rarity} upgrade");
        }
        assert!(
            upgrades
                .iter()
                .any(|u| u.unlocks == Some(AttackUnlock::Next))
        );
    }

    #[test]
    fn effects_parse_from_ron() {
        let upgrades = UpgradeLoader::parse(
            r#"[(id: "a", name: "A", rarity: Epic, effects: [MaxHealth(10.0), Shield(5.0)], is_unique: true)]"#,
        )
        .unwrap();

        assert_eq!(
            upgrades[0].effects,
            vec![UpgradeEffect::MaxHealth(10.0), UpgradeEffect::Shield(5.0)]
        );
        assert_eq!(upgrades[0].stack_limit(), 1);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = UpgradeLoader::parse(
            r#"[(id: "a", name: "A", rarity: Common), (id: "a", name: "B", rarity: Rare)]"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }
}
