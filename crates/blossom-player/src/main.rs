//! Blossom Player - standalone binary
//!
//! Usage:
//!   blossom-player [scene.toml] [--fullscreen]

use anyhow::{Context, Result};
use blossom_scene::SceneConfig;
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "blossom-player")]
#[command(about = "Play the blossom experience in a window")]
struct Args {
    /// Scene configuration; built-in defaults when omitted
    scene: Option<PathBuf>,

    /// Launch in fullscreen mode
    #[arg(long)]
    fullscreen: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let (config, asset_dir) = match &args.scene {
        Some(path) => {
            let config = SceneConfig::load(path).with_context(|| format!("Failed to load {}", path.display()))?;
            let dir = path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
            (config, dir)
        }
        None => (SceneConfig::default(), PathBuf::from(".")),
    };

    println!("Controls:");
    println!("  Click / Enter  - Start");
    println!("  Drag           - Orbit");
    println!("  Wheel / Pinch  - Zoom");
    println!("  Space          - Pause");
    println!("  M              - Mute");
    println!("  R              - Toggle auto-rotate");
    println!("  F / F11        - Fullscreen");
    println!("  Escape         - Back");

    if let Some(target) = blossom_player::run(config, &asset_dir, args.fullscreen)? {
        println!("Navigated to: {target}");
    }
    Ok(())
}
