//! Screen-space mist puffs, drawn behind and in front of the scene

use crate::pool::{Bounds, DrawContext, Fate, PoolEntity, StepContext};
use crate::rand::ParticleRng;
use blossom_core::math::lerp;
use blossom_core::Color;
use blossom_render::palette;
use blossom_render::{Paint, RadialGradient, Surface};

#[derive(Debug, Clone)]
pub struct MistPuff {
    /// Screen position (logical px)
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub alpha: f32,
    pub vx: f32,
    pub vy: f32,
    pub color: Color,
}

impl MistPuff {
    /// Drift speed multiplier for a swirl amount
    pub fn flow(swirl: f32) -> f32 {
        lerp(0.32, 1.0, swirl)
    }
}

impl PoolEntity for MistPuff {
    fn spawn(rng: &mut ParticleRng, bounds: &Bounds, _initial: bool) -> Self {
        Self {
            x: rng.range(-0.1, 1.1) * bounds.width,
            y: rng.range(-0.1, 1.1) * bounds.height,
            radius: rng.range(70.0, 240.0),
            alpha: rng.range(0.02, 0.07),
            vx: rng.range(-10.0, 10.0),
            vy: rng.range(-6.0, 6.0),
            color: rng.pick(&[palette::WHITE, palette::LEAF, palette::ACCENT2]),
        }
    }

    /// Wraps toroidally around the padded viewport; never expires
    fn update(&mut self, ctx: &StepContext, _rng: &mut ParticleRng) -> Fate {
        let flow = Self::flow(ctx.scalars.swirl);
        let (w, h, r) = (ctx.bounds.width, ctx.bounds.height, self.radius);
        self.x += self.vx * ctx.dt * flow;
        self.y += self.vy * ctx.dt * flow;
        if self.x < -r {
            self.x = w + r;
        }
        if self.x > w + r {
            self.x = -r;
        }
        if self.y < -r {
            self.y = h + r;
        }
        if self.y > h + r {
            self.y = -r;
        }
        Fate::Alive
    }

    fn draw(&self, ctx: &DrawContext, surface: &mut dyn Surface, _rng: &mut ParticleRng) {
        let a = self.alpha * ctx.fog;
        if a <= 1e-4 {
            return;
        }
        let puff = RadialGradient::new(self.x, self.y, 0.0, self.radius)
            .with_stop(0.0, self.color.with_alpha(a))
            .with_stop(1.0, self.color.with_alpha(0.0));
        surface.fill_circle(self.x, self.y, self.radius, &Paint::Radial(puff));
    }
}
