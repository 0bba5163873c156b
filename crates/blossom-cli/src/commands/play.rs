//! Play command: launches the windowed player

use super::load_config;
use anyhow::{Context, Result};
use std::path::Path;

pub fn run(config_path: Option<&Path>, fullscreen: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let asset_dir = config_path
        .and_then(Path::parent)
        .filter(|d| !d.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();

    println!("Controls:");
    println!("  Click / Enter  - Start");
    println!("  Drag           - Orbit");
    println!("  Wheel / Pinch  - Zoom");
    println!("  Space          - Pause");
    println!("  M              - Mute");
    println!("  R              - Toggle auto-rotate");
    println!("  F / F11        - Fullscreen");
    println!("  Escape         - Back");

    let target = blossom_player::run(config, &asset_dir, fullscreen).context("Player failed")?;
    if let Some(target) = target {
        println!("Navigated to: {target}");
    }
    Ok(())
}
