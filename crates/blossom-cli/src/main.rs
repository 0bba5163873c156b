//! Blossom CLI - Command-line interface for the bloom experience

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{init, play, render, timeline};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "blossom")]
#[command(about = "Phase-driven blooming-flower animation", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default scene configuration
    Init {
        /// Output TOML path
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the phase table and sampled control scalars
    Timeline {
        /// Scene configuration
        #[arg(long)]
        config: Option<PathBuf>,

        /// Evenly spaced samples across the run
        #[arg(long, default_value = "12")]
        samples: usize,

        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = parse_format)]
        format: String,
    },

    /// Render frames to PNG (headless, deterministic)
    Render {
        /// Scene configuration
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output PNG path, or directory with --frames
        #[arg(short, long, default_value = "blossom.png")]
        out: PathBuf,

        /// Image width in logical pixels
        #[arg(long, default_value = "1280")]
        width: u32,

        /// Image height in logical pixels
        #[arg(long, default_value = "720")]
        height: u32,

        /// Device pixel ratio
        #[arg(long, default_value = "1.0")]
        dpr: f32,

        /// Simulation time of the single frame, in seconds
        #[arg(long, default_value = "20.0", conflicts_with = "frames")]
        at: f64,

        /// Write this many consecutive frames from t = 0
        #[arg(long)]
        frames: Option<usize>,

        /// Simulation rate
        #[arg(long, default_value = "30.0")]
        fps: f64,

        /// Initial camera yaw in degrees
        #[arg(long, allow_hyphen_values = true)]
        yaw: Option<f32>,

        /// Initial camera pitch in degrees
        #[arg(long, allow_hyphen_values = true)]
        pitch: Option<f32>,

        /// Initial camera zoom
        #[arg(long)]
        zoom: Option<f32>,

        /// Disable auto-rotation
        #[arg(long)]
        still: bool,
    },

    /// Play the experience in a window
    Play {
        /// Scene configuration
        #[arg(long)]
        config: Option<PathBuf>,

        /// Launch in fullscreen mode
        #[arg(long)]
        fullscreen: bool,
    },
}

fn parse_format(s: &str) -> Result<String, String> {
    match s {
        "text" | "json" => Ok(s.to_string()),
        _ => Err(format!("unknown format '{s}'; valid values: text, json")),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Init { path, force } => init::run(&path, force),
        Commands::Timeline {
            config,
            samples,
            format,
        } => timeline::run(config.as_deref(), samples, &format),
        Commands::Render {
            config,
            out,
            width,
            height,
            dpr,
            at,
            frames,
            fps,
            yaw,
            pitch,
            zoom,
            still,
        } => render::run(render::RenderArgs {
            config,
            out,
            width,
            height,
            dpr,
            at,
            frames,
            fps,
            yaw,
            pitch,
            zoom,
            still,
        }),
        Commands::Play { config, fullscreen } => play::run(config.as_deref(), fullscreen),
    }
}
