//! Blossom Scene - The bloom experience
//!
//! - `SceneConfig`: TOML-backed scene description (timeline, camera, pools,
//!   bloom, audio and navigation settings)
//! - `Bloom`: layered petal composite that opens with the bloom scalar and
//!   emits sparks from open petal tips
//! - `glow` / `overlay`: core glow, stamens, vignette and afterglow flash
//! - `FrameDriver`: the per-frame update and paint sequence

mod bloom;
mod config;
mod driver;
pub mod glow;
pub mod overlay;

pub use bloom::{bloom_scale, swirl_residue, Bloom, BloomState, Petal};
pub use config::{
    AudioConfig, BloomConfig, CameraConfig, CueSounds, ExperienceConfig, FrameConfig, PhaseConfig, PoolsConfig,
    SceneConfig, SeedConfig, TimelineConfig,
};
pub use driver::{FrameDriver, FrameReport, SimulationContext, Viewport};
pub use glow::CoreGlow;
