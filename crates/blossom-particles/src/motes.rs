//! Drifting dust motes with short fading trails

use crate::pool::{Bounds, DrawContext, Fate, PoolEntity, StepContext};
use crate::rand::ParticleRng;
use blossom_core::math::{clamp, lerp, smoothstep};
use blossom_core::{Color, Vec3};
use blossom_render::palette;
use blossom_render::{Paint, RadialGradient, Surface};

#[derive(Debug, Clone)]
pub struct Mote {
    pub pos: Vec3,
    /// Position before the last update, for the trail
    pub prev: Option<Vec3>,
    pub vel: Vec3,
    pub radius: f32,
    pub color: Color,
    pub age: f32,
    pub life: f32,
    pub twinkle: f32,
    pub twinkle_speed: f32,
    /// Leaving this half-extent expires the mote
    pub extent: (f32, f32),
}

impl PoolEntity for Mote {
    fn spawn(rng: &mut ParticleRng, bounds: &Bounds, initial: bool) -> Self {
        let ang = rng.angle();
        let rad = rng.next_f32().powf(0.55) * bounds.min_side() * rng.range(0.25, 1.0);
        let z = if initial {
            rng.range(-150.0, 650.0)
        } else {
            rng.range(-350.0, 650.0)
        };
        let vel = Vec3::new(rng.range(-14.0, 14.0), rng.range(-8.0, 18.0), rng.range(-8.0, 16.0));
        let radius = rng.range(0.7, 2.2);
        let color = if rng.chance(0.55) { palette::LEAF } else { palette::LEAF2 };
        let life = rng.range(3.5, 8.5);
        let age = rng.range(0.0, life);
        Self {
            pos: Vec3::new(ang.cos() * rad, ang.sin() * rad, z),
            prev: None,
            vel,
            radius,
            color,
            age,
            life,
            twinkle: rng.angle(),
            twinkle_speed: rng.range(1.0, 2.6),
            extent: (bounds.width * 1.4, bounds.height * 1.4),
        }
    }

    fn update(&mut self, ctx: &StepContext, _rng: &mut ParticleRng) -> Fate {
        let s = &ctx.scalars;
        let dt = ctx.dt;
        self.age += dt;
        self.twinkle += dt * self.twinkle_speed;
        self.prev = Some(self.pos);

        self.pos = self.pos + self.vel * dt;

        let swirl_k = lerp(0.10, 1.0, smoothstep(0.2, 1.0, s.swirl));
        self.pos = self.pos.rotated_z(s.omega * dt * 0.68 * swirl_k);

        let keep = 1.0 - s.pull * s.pull * dt * 0.78;
        self.pos.x *= keep;
        self.pos.y *= keep;

        let escaped = self.pos.x.abs() > self.extent.0 || self.pos.y.abs() > self.extent.1;
        if self.age >= self.life || escaped {
            Fate::Expired
        } else {
            Fate::Alive
        }
    }

    fn draw(&self, ctx: &DrawContext, surface: &mut dyn Surface, _rng: &mut ParticleRng) {
        let pr = ctx.project(self.pos);
        let tw = 0.7 + 0.3 * self.twinkle.sin();
        let a = clamp((0.11 + 0.20 * tw) * (1.0 - 0.45 * ctx.fog), 0.0, 0.36);
        let rr = self.radius * (0.6 + pr.scale) * (0.9 + 0.4 * tw);

        if let Some(prev) = self.prev {
            let pp = ctx.project(prev);
            surface.stroke_line(pp.x, pp.y, pr.x, pr.y, (rr * 0.8).max(0.6), self.color.with_alpha(a * 0.35));
        }

        let glow = RadialGradient::new(pr.x, pr.y, 0.0, rr * 4.0)
            .with_stop(0.0, self.color.with_alpha(a * 1.7))
            .with_stop(0.55, palette::LEAF.with_alpha(a * 0.65))
            .with_stop(1.0, palette::WHITE.with_alpha(0.0));
        surface.fill_circle(pr.x, pr.y, rr * 4.0, &Paint::Radial(glow));
        surface.fill_circle(pr.x, pr.y, rr * 0.9, &Paint::Solid(palette::WHITE.with_alpha(a * 0.55)));
    }

    fn lifetime(&self) -> Option<(f32, f32)> {
        Some((self.age, self.life))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::tests::step;
    use crate::pool::ResettingPool;
    use blossom_runtime::ControlScalars;

    #[test]
    fn spawned_age_is_within_life() {
        let mut rng = ParticleRng::new(99);
        let bounds = Bounds::new(1280.0, 720.0);
        for _ in 0..500 {
            let m = Mote::spawn(&mut rng, &bounds, false);
            assert!(m.age >= 0.0 && m.age < m.life);
            assert!(m.prev.is_none());
        }
    }

    #[test]
    fn update_records_trail_origin() {
        let mut rng = ParticleRng::new(5);
        let bounds = Bounds::new(1280.0, 720.0);
        let mut m = Mote::spawn(&mut rng, &bounds, true);
        m.age = 0.0;
        let before = m.pos;
        m.update(&step(1.0 / 60.0, ControlScalars::default()), &mut rng);
        assert_eq!(m.prev, Some(before));
    }

    #[test]
    fn leaving_bounds_expires() {
        let mut rng = ParticleRng::new(5);
        let bounds = Bounds::new(100.0, 100.0);
        let mut m = Mote::spawn(&mut rng, &bounds, true);
        m.age = 0.0;
        m.pos = Vec3::new(1000.0, 0.0, 0.0);
        assert_eq!(m.update(&step(0.01, ControlScalars::default()), &mut rng), Fate::Expired);
    }

    #[test]
    fn pool_of_motes_holds_invariants_under_vortex() {
        let mut rng = ParticleRng::new(0xB105_50A1);
        let bounds = Bounds::new(1280.0, 720.0);
        let mut pool: ResettingPool<Mote> = ResettingPool::new(300, &mut rng, &bounds);
        let scalars = ControlScalars {
            swirl: 1.0,
            pull: 1.55,
            omega: 18.5,
            fog: 0.7,
            ..Default::default()
        };
        let ctx = step(1.0 / 60.0, scalars);
        for frame in 0..900 {
            pool.update(&ctx, &mut rng);
            assert_eq!(pool.len(), 300);
            for m in pool.iter() {
                assert!(m.age >= 0.0 && m.age < m.life, "frame {frame}: {} / {}", m.age, m.life);
                assert!(m.pos.is_finite());
            }
        }
        assert!(pool.resets() > 0);
    }
}
