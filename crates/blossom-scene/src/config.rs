//! Scene configuration loaded from TOML
//!
//! `SceneConfig::default()` is the canonical bloom experience. Every section
//! is optional in a file; missing sections and fields take their defaults.

use blossom_core::{BlossomError, Easing, Result};
use blossom_particles::PoolSizing;
use blossom_render::{Lens, OrbitLimits, OrbitState};
use blossom_runtime::{ControlScalars, CurveSegment, CurveSet, Phase, Timeline};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub seed: SeedConfig,
    pub frame: FrameConfig,
    pub camera: CameraConfig,
    pub pools: PoolsConfig,
    pub bloom: BloomConfig,
    pub audio: AudioConfig,
    pub experience: ExperienceConfig,
    pub timeline: TimelineConfig,
}

/// One phase: duration, easing and the scalars reached at its end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseConfig {
    pub name: String,
    pub duration: f64,
    #[serde(default)]
    pub easing: Easing,
    pub end: ControlScalars,
}

impl PhaseConfig {
    fn new(name: &str, duration: f64, easing: Easing, end: [f32; 6]) -> Self {
        let [swirl, pull, omega, fog, bloom, afterglow] = end;
        Self {
            name: name.to_string(),
            duration,
            easing,
            end: ControlScalars {
                swirl,
                pull,
                omega,
                fog,
                bloom,
                afterglow,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Phase index at which the bloom leaves its dormant state
    pub bloom_phase: usize,
    /// Scalars at t = 0
    pub initial: ControlScalars,
    pub phases: Vec<PhaseConfig>,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        use Easing::{EaseInOutCubic, Smoothstep};
        Self {
            bloom_phase: 4,
            initial: ControlScalars {
                omega: 0.22,
                ..Default::default()
            },
            phases: vec![
                PhaseConfig::new("gather", 2.2, Smoothstep, [0.10, 0.0, 0.35, 0.25, 0.0, 0.0]),
                PhaseConfig::new("swirl", 8.4, EaseInOutCubic, [0.86, 0.30, 4.8, 0.58, 0.0, 0.0]),
                PhaseConfig::new("vortex", 3.4, Smoothstep, [1.0, 1.55, 18.5, 0.70, 0.0, 0.0]),
                PhaseConfig::new("release", 2.9, EaseInOutCubic, [0.52, 0.10, 2.4, 0.80, 0.0, 0.0]),
                PhaseConfig::new("bloom", 7.6, EaseInOutCubic, [0.06, 0.0, 0.28, 0.92, 1.0, 0.0]),
                PhaseConfig::new("afterglow", 4.4, EaseInOutCubic, [0.0, 0.0, 0.08, 0.65, 1.0, 1.0]),
            ],
        }
    }
}

impl TimelineConfig {
    pub fn timeline(&self) -> Timeline {
        Timeline::new(
            self.phases
                .iter()
                .map(|p| Phase {
                    name: p.name.clone(),
                    duration: p.duration,
                })
                .collect(),
        )
    }

    pub fn curves(&self) -> CurveSet {
        CurveSet::new(
            self.initial,
            self.phases
                .iter()
                .map(|p| CurveSegment {
                    easing: p.easing,
                    end: p.end,
                })
                .collect(),
        )
    }

    pub fn total_duration(&self) -> f64 {
        self.phases.iter().map(|p| p.duration).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov: f32,
    pub distance: f32,
    pub min_depth: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub pitch_min: f32,
    pub pitch_max: f32,
    pub zoom: f32,
    pub zoom_min: f32,
    pub zoom_max: f32,
    pub rotation_period: f32,
    pub auto_rotate: bool,
    pub drag_yaw: f32,
    pub drag_pitch: f32,
    pub wheel_step: f32,
    /// Ambient spin rate (rad/s) at swirl 0
    pub spin_min: f32,
    /// Ambient spin rate (rad/s) at swirl 1
    pub spin_max: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        let lens = Lens::default();
        let limits = OrbitLimits::default();
        Self {
            fov: lens.fov,
            distance: lens.distance,
            min_depth: lens.min_depth,
            yaw: 0.0,
            pitch: -0.18,
            pitch_min: limits.pitch_min,
            pitch_max: limits.pitch_max,
            zoom: 1.0,
            zoom_min: limits.zoom_min,
            zoom_max: limits.zoom_max,
            rotation_period: limits.rotation_period,
            auto_rotate: true,
            drag_yaw: limits.drag_yaw,
            drag_pitch: limits.drag_pitch,
            wheel_step: limits.wheel_step,
            spin_min: 0.02,
            spin_max: 0.14,
        }
    }
}

impl CameraConfig {
    pub fn lens(&self) -> Lens {
        Lens {
            fov: self.fov,
            distance: self.distance,
            min_depth: self.min_depth,
        }
    }

    pub fn limits(&self) -> OrbitLimits {
        OrbitLimits {
            pitch_min: self.pitch_min,
            pitch_max: self.pitch_max,
            zoom_min: self.zoom_min,
            zoom_max: self.zoom_max,
            drag_yaw: self.drag_yaw,
            drag_pitch: self.drag_pitch,
            wheel_step: self.wheel_step,
            rotation_period: self.rotation_period,
        }
    }

    pub fn orbit(&self) -> OrbitState {
        let mut orbit = OrbitState::new(self.yaw, self.pitch, self.zoom, self.limits());
        orbit.auto_rotate = self.auto_rotate;
        orbit
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolsConfig {
    /// Fixed spark capacity
    pub sparks: usize,
    pub stars: PoolSizing,
    pub mist: PoolSizing,
    pub motes: PoolSizing,
    pub flakes: PoolSizing,
}

impl Default for PoolsConfig {
    fn default() -> Self {
        Self {
            sparks: 260,
            stars: PoolSizing::new(1500.0, 560, 1200),
            mist: PoolSizing::new(82000.0, 12, 22),
            motes: PoolSizing::new(4500.0, 260, 520),
            flakes: PoolSizing::new(16000.0, 80, 180),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloomConfig {
    /// Petals per concentric layer, innermost first
    pub layers: Vec<usize>,
    /// Reveal delay per layer, in bloom progress
    pub layer_delay: f32,
    /// Per-petal, per-step chance of emitting a spark once open enough
    pub emit_probability: f32,
    pub emit_openness: f32,
    pub stamens: usize,
}

impl Default for BloomConfig {
    fn default() -> Self {
        Self {
            layers: vec![10, 16, 22, 28],
            layer_delay: 0.16,
            emit_probability: 0.018,
            emit_openness: 0.6,
            stamens: 34,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Upper bound on a single frame step (seconds)
    pub max_dt: f64,
    /// Device pixel ratio cap
    pub dpr_max: f32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_dt: 1.0 / 30.0,
            dpr_max: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CueSounds {
    pub whoosh: Option<PathBuf>,
    pub sparkle: Option<PathBuf>,
    pub bloom: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Looped background track
    pub music: Option<PathBuf>,
    /// Linear amplitude, 0..1
    pub volume: f64,
    pub muted: bool,
    pub cues: CueSounds,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            music: None,
            volume: 0.55,
            muted: false,
            cues: CueSounds::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceConfig {
    /// Hold the timeline until the first user gesture
    pub wait_for_unlock: bool,
    pub next_screen: String,
    pub back_screen: String,
    /// Hand off to `next_screen` when the timeline finishes
    pub navigate_on_finish: bool,
}

impl Default for ExperienceConfig {
    fn default() -> Self {
        Self {
            wait_for_unlock: true,
            next_screen: "next".to_string(),
            back_screen: "back".to_string(),
            navigate_on_finish: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub seed: u32,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self { seed: 0xB105_50A1 }
    }
}

fn config_error(msg: impl Into<String>) -> BlossomError {
    BlossomError::ConfigError(msg.into())
}

impl SceneConfig {
    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)
            .map_err(|e| config_error(format!("{}: {e}", path.display())))?;
        log::info!("[config] loaded {}", path.display());
        Ok(config)
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: SceneConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let tl = &self.timeline;
        if tl.phases.is_empty() {
            return Err(config_error("timeline has no phases"));
        }
        for p in &tl.phases {
            if !(p.duration.is_finite() && p.duration > 0.0) {
                return Err(config_error(format!(
                    "phase '{}' must have a positive duration, got {}",
                    p.name, p.duration
                )));
            }
        }
        if tl.bloom_phase >= tl.phases.len() {
            return Err(BlossomError::ValueOutOfRange {
                field: "timeline.bloom_phase".to_string(),
                min: 0.0,
                max: (tl.phases.len() - 1) as f64,
                value: tl.bloom_phase as f64,
            });
        }

        let cam = &self.camera;
        if cam.pitch_min > cam.pitch_max {
            return Err(config_error("camera.pitch_min exceeds camera.pitch_max"));
        }
        if cam.zoom_min <= 0.0 || cam.zoom_min > cam.zoom_max {
            return Err(config_error("camera zoom range must be positive and ordered"));
        }
        if cam.min_depth <= 0.0 || cam.fov <= 0.0 {
            return Err(config_error("camera.fov and camera.min_depth must be positive"));
        }

        let pools = &self.pools;
        for (name, sizing) in [
            ("stars", &pools.stars),
            ("mist", &pools.mist),
            ("motes", &pools.motes),
            ("flakes", &pools.flakes),
        ] {
            if sizing.min > sizing.max {
                return Err(config_error(format!("pools.{name}: min exceeds max")));
            }
        }

        if self.bloom.layers.is_empty() {
            return Err(config_error("bloom needs at least one layer"));
        }
        if self.bloom.layers.contains(&0) {
            return Err(config_error("bloom layers must have at least one petal"));
        }

        if !(self.frame.max_dt.is_finite() && self.frame.max_dt > 0.0) {
            return Err(config_error("frame.max_dt must be positive"));
        }
        if !(self.frame.dpr_max.is_finite() && self.frame.dpr_max > 0.0) {
            return Err(config_error("frame.dpr_max must be positive"));
        }

        if !(0.0..=1.0).contains(&self.audio.volume) {
            return Err(BlossomError::ValueOutOfRange {
                field: "audio.volume".to_string(),
                min: 0.0,
                max: 1.0,
                value: self.audio.volume,
            });
        }
        Ok(())
    }
}
