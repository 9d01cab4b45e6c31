//! Content factory for building the battle catalog from data files.

use std::path::{Path, PathBuf};

use anyhow::Context;
use battle_core::{
    ArchetypeId, AttackOracle, BattleConfig, StaticCatalog, UpgradeDefinition, UpgradeOracle,
};
use tracing::{debug, warn};

use crate::loaders::attacks::Movesets;
use crate::loaders::{AttackLoader, ConfigLoader, LoadResult, UpgradeLoader};

/// Content factory that loads all battle content.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── attacks.ron
/// └── upgrades.ron
/// ```
///
/// Files missing from the directory fall back to the embedded defaults.
#[derive(Clone, Debug, Default)]
pub struct ContentFactory {
    data_dir: Option<PathBuf>,
}

impl ContentFactory {
    /// Creates a content factory reading from a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: Some(data_dir.into()),
        }
    }

    /// Creates a content factory that only uses the embedded data.
    pub fn embedded() -> Self {
        Self { data_dir: None }
    }

    /// Returns the data directory path, if any.
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    fn file(&self, name: &str) -> Option<PathBuf> {
        let path = self.data_dir.as_ref()?.join(name);
        if path.is_file() {
            Some(path)
        } else {
            debug!(path = %path.display(), "content file not found, using embedded data");
            None
        }
    }

    /// Load battle configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<BattleConfig> {
        match self.file("config.toml") {
            Some(path) => ConfigLoader::load(&path),
            None => ConfigLoader::embedded(),
        }
    }

    /// Load attack movesets from `attacks.ron`.
    pub fn load_movesets(&self) -> LoadResult<Movesets> {
        match self.file("attacks.ron") {
            Some(path) => AttackLoader::load(&path),
            None => AttackLoader::embedded(),
        }
    }

    /// Load the upgrade pool from `upgrades.ron`.
    pub fn load_upgrades(&self) -> LoadResult<Vec<UpgradeDefinition>> {
        match self.file("upgrades.ron") {
            Some(path) => UpgradeLoader::load(&path),
            None => UpgradeLoader::embedded(),
        }
    }

    /// Loads and validates everything a battle needs.
    pub fn load(&self) -> LoadResult<Content> {
        let mut catalog = StaticCatalog::new();
        for (archetype, attacks) in self.load_movesets()? {
            catalog.insert_moveset(archetype, attacks);
        }
        catalog.set_upgrades(self.load_upgrades()?);
        catalog.validate().context("invalid battle catalog")?;

        let content = Content {
            catalog,
            config: self.load_config()?,
        };
        content.warn_unknown_enemies();

        debug!(
            movesets = content.catalog.moveset_count(),
            upgrades = content.catalog.upgrades().len(),
            "battle content loaded"
        );
        Ok(content)
    }
}

/// Loaded catalog and configuration.
#[derive(Clone, Debug)]
pub struct Content {
    pub catalog: StaticCatalog,
    pub config: BattleConfig,
}

impl Content {
    /// Resolves a player archetype name.
    ///
    /// Names are matched case-insensitively; unknown names fall back to the
    /// `Default` moveset with a warning.
    pub fn player_archetype(&self, name: &str) -> ArchetypeId {
        let name = name.trim();
        let found = self
            .catalog
            .archetypes()
            .into_iter()
            .find(|archetype| archetype.as_str().eq_ignore_ascii_case(name));

        match found {
            Some(archetype) => archetype,
            None => {
                let requested = ArchetypeId::new(name);
                if let Err(error) = self.catalog.try_attacks_for(&requested) {
                    warn!(%error, "unknown player archetype, using the Default moveset");
                }
                ArchetypeId::fallback()
            }
        }
    }

    fn warn_unknown_enemies(&self) {
        for archetype in &self.config.waves.enemy_pool {
            if let Err(error) = self.catalog.try_attacks_for(archetype) {
                warn!(%error, "enemy pool entry will use the Default moveset");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_content_loads_and_validates() {
        let content = ContentFactory::embedded().load().unwrap();

        assert_eq!(content.catalog.moveset_count(), 9);
        assert!(!content.catalog.upgrades().is_empty());
        assert_eq!(content.config.waves.max_waves, 5);
    }

    #[test]
    fn archetype_names_resolve_loosely() {
        let content = ContentFactory::embedded().load().unwrap();

        assert_eq!(content.player_archetype("gunslinger"), ArchetypeId::new("Gunslinger"));
        assert_eq!(content.player_archetype("Necromancer"), ArchetypeId::fallback());
    }

    #[test]
    fn missing_directory_files_use_embedded_data() {
        let factory = ContentFactory::new("/nonexistent/battle-data");
        assert_eq!(factory.data_dir(), Some(Path::new("/nonexistent/battle-data")));

        let movesets = factory.load_movesets().unwrap();
        assert!(movesets.contains_key(&ArchetypeId::new("Brawler")));
    }
}
