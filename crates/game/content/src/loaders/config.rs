//! Battle configuration loader.

use std::path::Path;

use anyhow::Context;
use battle_core::BattleConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for battle configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Configuration embedded in the crate.
    pub const EMBEDDED: &'static str = include_str!("../../data/config.toml");

    /// Load config data from a TOML file.
    ///
    /// Missing keys take the defaults of [`BattleConfig`].
    pub fn load(path: &Path) -> LoadResult<BattleConfig> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<BattleConfig> {
        toml::from_str(content).context("Failed to parse config TOML")
    }

    pub fn embedded() -> LoadResult<BattleConfig> {
        Self::parse(Self::EMBEDDED)
    }
}
