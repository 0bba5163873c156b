//! Default configuration writer

use anyhow::{Context, Result};
use blossom_scene::SceneConfig;
use std::path::Path;

pub fn run(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("'{}' already exists (use --force to overwrite)", path.display());
    }
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("Failed to create '{}'", dir.display()))?;
    }
    SceneConfig::default()
        .save(path)
        .with_context(|| format!("Failed to write '{}'", path.display()))?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}
