//! Background starfield streaming toward the camera

use crate::pool::{Bounds, DrawContext, Fate, PoolEntity, StepContext};
use crate::rand::ParticleRng;
use blossom_core::math::{clamp, lerp};
use blossom_core::Vec3;
use blossom_render::palette;
use blossom_render::{Paint, Surface};

/// Depth past which a star wraps back behind the field
pub const WRAP_FAR: f32 = 1400.0;
pub const WRAP_TO: f32 = -650.0;

#[derive(Debug, Clone)]
pub struct Star {
    pub pos: Vec3,
    pub radius: f32,
    pub twinkle: f32,
    pub twinkle_speed: f32,
    pub brightness: f32,
}

impl PoolEntity for Star {
    fn spawn(rng: &mut ParticleRng, bounds: &Bounds, initial: bool) -> Self {
        let radius = rng.range(0.6, 1.9);
        let twinkle = rng.angle();
        let twinkle_speed = rng.range(0.8, 2.2);
        let brightness = rng.range(0.15, 1.0);

        let ang = rng.angle();
        let rad = rng.next_f32().powf(0.3) * bounds.min_side() * rng.range(0.35, 0.70);
        let z = if initial {
            rng.range(-200.0, 900.0)
        } else {
            rng.range(-500.0, 800.0)
        };
        Self {
            pos: Vec3::new(ang.cos() * rad, ang.sin() * rad, z),
            radius,
            twinkle,
            twinkle_speed,
            brightness,
        }
    }

    fn update(&mut self, ctx: &StepContext, _rng: &mut ParticleRng) -> Fate {
        let s = &ctx.scalars;
        let dt = ctx.dt;
        self.twinkle += dt * self.twinkle_speed;

        self.pos = self.pos.rotated_z(s.omega * dt * (0.30 + 0.70 * s.swirl));
        let keep = 1.0 - s.pull * dt;
        self.pos.x *= keep;
        self.pos.y *= keep;

        self.pos.z += dt * lerp(5.0, 42.0, s.swirl) * (0.15 + 0.85 * s.pull);
        if self.pos.z > WRAP_FAR {
            self.pos.z = WRAP_TO;
        }

        if s.pull > 0.8 && self.pos.radial_sq() < 14.0 {
            Fate::Expired
        } else {
            Fate::Alive
        }
    }

    fn draw(&self, ctx: &DrawContext, surface: &mut dyn Surface, rng: &mut ParticleRng) {
        let swirl = ctx.scalars.swirl;
        let pr = ctx.project(self.pos);
        let tw = 0.65 + 0.35 * self.twinkle.sin();
        let r = self.radius * (0.55 + 1.15 * pr.scale) * (0.9 + 0.4 * swirl);
        let a = clamp((0.10 + 0.55 * self.brightness) * tw * (1.0 - 0.55 * ctx.fog), 0.0, 0.85);

        let flicker = rng.chance(0.012) && swirl > 0.55;
        let c = if flicker {
            rng.pick(&[palette::ACCENT1, palette::ACCENT2, palette::WHITE])
        } else {
            palette::WHITE
        };

        surface.fill_circle(pr.x, pr.y, r, &Paint::Solid(c.with_alpha(a)));
        if swirl > 0.45 && self.brightness > 0.6 {
            surface.fill_circle(pr.x, pr.y, r * 3.0, &Paint::Solid(c.with_alpha(a * 0.26)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::tests::step;
    use blossom_runtime::ControlScalars;

    fn star_at(x: f32, y: f32, z: f32) -> Star {
        Star {
            pos: Vec3::new(x, y, z),
            radius: 1.0,
            twinkle: 0.0,
            twinkle_speed: 1.0,
            brightness: 0.5,
        }
    }

    #[test]
    fn depth_wraps_instead_of_resetting() {
        let mut rng = ParticleRng::new(1);
        let mut star = star_at(100.0, 0.0, WRAP_FAR - 0.01);
        let scalars = ControlScalars {
            swirl: 1.0,
            pull: 1.0,
            ..Default::default()
        };
        let fate = star.update(&step(1.0 / 30.0, scalars), &mut rng);
        assert_eq!(fate, Fate::Alive);
        assert_eq!(star.pos.z, WRAP_TO);
    }

    #[test]
    fn strong_pull_near_axis_expires() {
        let mut rng = ParticleRng::new(1);
        let mut star = star_at(1.0, 1.0, 0.0);
        let scalars = ControlScalars {
            pull: 1.2,
            ..Default::default()
        };
        assert_eq!(star.update(&step(0.01, scalars), &mut rng), Fate::Expired);
    }

    #[test]
    fn rotation_preserves_radius_without_pull() {
        let mut rng = ParticleRng::new(1);
        let mut star = star_at(200.0, 0.0, 0.0);
        let scalars = ControlScalars {
            swirl: 0.5,
            omega: 3.0,
            ..Default::default()
        };
        star.update(&step(1.0 / 30.0, scalars), &mut rng);
        assert!((star.pos.radial_sq().sqrt() - 200.0).abs() < 1e-3);
        assert!(star.pos.y > 0.0);
    }
}
