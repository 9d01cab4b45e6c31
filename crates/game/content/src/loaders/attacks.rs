//! Attack moveset loader.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use battle_core::{ArchetypeId, AttackDefinition};

use crate::loaders::{LoadResult, read_file};

/// Movesets keyed by archetype, each in catalog order.
pub type Movesets = BTreeMap<ArchetypeId, Vec<AttackDefinition>>;

/// Loader for attack movesets from RON files.
///
/// File format: `{ "Archetype": [AttackDefinition, ...], ... }`
///
/// ```ron
/// {
///     "Brawler": [
///         (name: "Jab", kind: MeleeHit, base_damage: 12.0, accuracy: 0.95),
///     ],
/// }
/// ```
pub struct AttackLoader;

impl AttackLoader {
    /// Movesets embedded in the crate.
    pub const EMBEDDED: &'static str = include_str!("../../data/attacks.ron");

    pub fn load(path: &Path) -> LoadResult<Movesets> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    /// Parses and validates RON moveset text.
    pub fn parse(content: &str) -> LoadResult<Movesets> {
        let movesets: Movesets =
            ron::from_str(content).context("Failed to parse attack moveset RON")?;

        for (archetype, attacks) in &movesets {
            for attack in attacks {
                attack
                    .validate()
                    .with_context(|| format!("invalid attack in moveset '{archetype}'"))?;
            }
        }

        Ok(movesets)
    }

    pub fn embedded() -> LoadResult<Movesets> {
        Self::parse(Self::EMBEDDED)
    }
}
