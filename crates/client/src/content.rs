//! Content selection for the terminal host.
use std::path::Path;

use anyhow::{Context, Result};
use battle_content::{ConfigLoader, Content, ContentFactory};

/// Loads battle content.
///
/// `path` may be a content directory (missing files fall back to the
/// embedded data) or a single TOML file overriding only the battle rules.
pub fn load_content(path: Option<&Path>) -> Result<Content> {
    match path {
        Some(file) if file.is_file() => {
            let mut content = ContentFactory::embedded().load()?;
            content.config = ConfigLoader::load(file)?;
            Ok(content)
        }
        Some(dir) => ContentFactory::new(dir)
            .load()
            .with_context(|| format!("failed to load content from {}", dir.display())),
        None => ContentFactory::embedded().load(),
    }
}
