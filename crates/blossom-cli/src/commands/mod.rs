//! CLI command implementations

pub mod init;
pub mod play;
pub mod render;
pub mod timeline;

use anyhow::{Context, Result};
use blossom_scene::SceneConfig;
use std::path::Path;

/// Load a scene configuration, or the built-in one when no path is given
pub fn load_config(path: Option<&Path>) -> Result<SceneConfig> {
    match path {
        Some(path) => {
            SceneConfig::load(path).with_context(|| format!("Failed to load config '{}'", path.display()))
        }
        None => Ok(SceneConfig::default()),
    }
}
