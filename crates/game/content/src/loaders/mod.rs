//! Content loaders for reading battle data from files.
//!
//! Each loader parses one file format into battle-core types. Every loader
//! has a `parse` entry point for in-memory text (used for the embedded
//! defaults) and a `load` entry point for a path.

pub mod attacks;
pub mod config;
pub mod factory;
pub mod upgrades;

pub use attacks::AttackLoader;
pub use config::ConfigLoader;
pub use factory::{Content, ContentFactory};
pub use upgrades::UpgradeLoader;

use std::path::Path;

use anyhow::Context;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file {}", path.display()))
}
