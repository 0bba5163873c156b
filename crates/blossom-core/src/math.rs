//! Interpolation and easing helpers shared by the timeline and the simulations

use serde::{Deserialize, Serialize};

pub const TAU: f32 = std::f32::consts::TAU;

pub fn clamp(v: f32, lo: f32, hi: f32) -> f32 {
    v.max(lo).min(hi)
}

pub fn clamp01(v: f32) -> f32 {
    clamp(v, 0.0, 1.0)
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Hermite smoothstep of `t` over the edge interval `[a, b]`
pub fn smoothstep(a: f32, b: f32, t: f32) -> f32 {
    let t = clamp01((t - a) / (b - a));
    t * t * (3.0 - 2.0 * t)
}

pub fn ease_in_out_cubic(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

pub fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

/// Easing curve selected per phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Smoothstep,
    EaseInOutCubic,
    EaseOutCubic,
}

impl Easing {
    /// Evaluate the curve; input is clamped to [0, 1]
    pub fn apply(&self, t: f32) -> f32 {
        let t = clamp01(t);
        match self {
            Easing::Smoothstep => smoothstep(0.0, 1.0, t),
            Easing::EaseInOutCubic => ease_in_out_cubic(t),
            Easing::EaseOutCubic => ease_out_cubic(t),
        }
    }
}
