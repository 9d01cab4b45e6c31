//! Data-driven battle content and loaders.
//!
//! This crate houses the static content of a run and provides loaders for
//! RON/TOML data files:
//! - Attack movesets per archetype (data-driven via RON)
//! - The upgrade pool (data-driven via RON)
//! - Battle configuration (data-driven via TOML)
//!
//! Content is consumed through battle-core's oracles and never appears in
//! battle state. The default data set is embedded at compile time; hosts can
//! point a [`ContentFactory`] at a directory to override it.

pub mod archetypes;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use archetypes::{ENEMY_ARCHETYPES, PLAYER_ARCHETYPES, is_player_archetype};

#[cfg(feature = "loaders")]
pub use loaders::{AttackLoader, ConfigLoader, Content, ContentFactory, UpgradeLoader};
