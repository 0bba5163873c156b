//! Falling petal flakes that get caught by the vortex

use crate::pool::{Bounds, DrawContext, Fate, PoolEntity, StepContext};
use crate::rand::ParticleRng;
use blossom_core::math::{clamp, smoothstep};
use blossom_core::{Color, Vec3};
use blossom_render::palette;
use blossom_render::Surface;

#[derive(Debug, Clone)]
pub struct Flake {
    pub pos: Vec3,
    pub fall: f32,
    pub drift: f32,
    pub spin: f32,
    pub spin_speed: f32,
    pub size: f32,
    pub color: Color,
    pub age: f32,
    pub life: f32,
    pub wobble: f32,
    pub wobble_speed: f32,
    /// Falling below this height expires the flake
    pub floor: f32,
}

impl Flake {
    /// Swirl/pull only act once swirl passes this gate
    pub fn vortex_gate(swirl: f32) -> f32 {
        smoothstep(0.45, 1.0, swirl)
    }
}

impl PoolEntity for Flake {
    fn spawn(rng: &mut ParticleRng, bounds: &Bounds, initial: bool) -> Self {
        let x = rng.range(-0.55, 0.55) * bounds.width;
        let y = rng.range(-0.65, 0.65) * bounds.height;
        let z = if initial {
            rng.range(-180.0, 520.0)
        } else {
            rng.range(-260.0, 520.0)
        };
        let fall = rng.range(18.0, 55.0);
        let drift = rng.range(-8.0, 8.0);
        let spin = rng.angle();
        let spin_speed = rng.range(-2.4, 2.4);
        let size = rng.range(1.2, 3.2);
        let color = rng.pick(&[palette::LEAF, palette::LEAF2, palette::WHITE]);
        let life = rng.range(4.0, 10.0);
        let age = rng.range(0.0, life);
        Self {
            pos: Vec3::new(x, y, z),
            fall,
            drift,
            spin,
            spin_speed,
            size,
            color,
            age,
            life,
            wobble: rng.angle(),
            wobble_speed: rng.range(0.7, 1.6),
            floor: bounds.height * 0.95,
        }
    }

    fn update(&mut self, ctx: &StepContext, rng: &mut ParticleRng) -> Fate {
        let s = &ctx.scalars;
        let dt = ctx.dt;
        self.age += dt;
        self.wobble += dt * self.wobble_speed;
        self.spin += dt * self.spin_speed;

        self.pos.x += (self.drift + 10.0 * self.wobble.sin()) * dt;
        self.pos.y += self.fall * dt;
        self.pos.z += rng.range(-2.0, 3.0) * dt;

        let gate = Self::vortex_gate(s.swirl);
        if gate > 0.0 {
            self.pos = self.pos.rotated_z(s.omega * dt * 0.55 * gate);
            let keep = 1.0 - s.pull * dt * 0.55 * gate;
            self.pos.x *= keep;
            self.pos.y *= keep;
        }

        if self.age >= self.life || self.pos.y > self.floor {
            Fate::Expired
        } else {
            Fate::Alive
        }
    }

    fn draw(&self, ctx: &DrawContext, surface: &mut dyn Surface, _rng: &mut ParticleRng) {
        let pr = ctx.project(self.pos);
        let a = clamp(0.12 * (1.0 - 0.35 * ctx.fog), 0.0, 0.22);
        let s = self.size * (0.65 + pr.scale);

        surface.fill_ellipse(pr.x, pr.y, s * 1.4, s * 0.9, self.spin, self.color.with_alpha(a));
        // Highlight, offset in the flake's rotated frame
        let (sn, cs) = self.spin.sin_cos();
        let (ox, oy) = (s * 0.25, -s * 0.10);
        surface.fill_ellipse(
            pr.x + ox * cs - oy * sn,
            pr.y + ox * sn + oy * cs,
            s * 0.55,
            s * 0.35,
            self.spin,
            palette::WHITE.with_alpha(a * 0.35),
        );
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

    fn flake() -> Flake {
        let mut rng = ParticleRng::new(8);
        let mut f = Flake::spawn(&mut rng, &Bounds::new(1280.0, 720.0), true);
        f.pos = Vec3::new(100.0, 0.0, 0.0);
        f.age = 0.0;
        f.life = 5.0;
        f
    }

    #[test]
    fn gate_is_closed_below_threshold() {
        assert_eq!(Flake::vortex_gate(0.3), 0.0);
        assert!(Flake::vortex_gate(0.8) > 0.0);
        assert!((Flake::vortex_gate(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn calm_flakes_only_fall() {
        let mut rng = ParticleRng::new(2);
        let mut f = flake();
        let scalars = ControlScalars {
            swirl: 0.3,
            pull: 1.0,
            omega: 5.0,
            ..Default::default()
        };
        f.update(&step(0.1, scalars), &mut rng);
        assert!((f.pos.y - f.fall * 0.1).abs() < 1e-4);
    }

    #[test]
    fn vortex_pulls_flakes_inward() {
        let mut rng = ParticleRng::new(2);
        let mut calm = flake();
        let mut caught = flake();
        let base = ControlScalars {
            swirl: 0.3,
            pull: 1.5,
            ..Default::default()
        };
        let vortex = ControlScalars { swirl: 1.0, ..base };
        calm.update(&step(0.1, base), &mut rng);
        caught.update(&step(0.1, vortex), &mut rng);
        assert!(caught.pos.x.abs() < calm.pos.x.abs());
    }

    #[test]
    fn falling_past_floor_expires() {
        let mut rng = ParticleRng::new(2);
        let mut f = flake();
        f.pos.y = f.floor - 0.1;
        assert_eq!(f.update(&step(0.1, ControlScalars::default()), &mut rng), Fate::Expired);
    }

    #[test]
    fn pool_of_flakes_holds_invariants_through_the_vortex() {
        let mut rng = ParticleRng::new(0xF1A4E);
        let bounds = Bounds::new(1280.0, 720.0);
        let mut pool: ResettingPool<Flake> = ResettingPool::new(180, &mut rng, &bounds);
        let calm = ControlScalars {
            swirl: 0.2,
            omega: 0.4,
            fog: 0.3,
            ..Default::default()
        };
        let vortex = ControlScalars {
            swirl: 1.0,
            pull: 1.55,
            omega: 18.5,
            fog: 0.7,
            ..Default::default()
        };
        // Ten seconds at 60 Hz, calm first, then caught in the vortex
        for frame in 0..600 {
            let scalars = if frame < 300 { calm } else { vortex };
            pool.update(&step(1.0 / 60.0, scalars), &mut rng);
            assert_eq!(pool.len(), 180);
            for f in pool.iter() {
                assert!(f.age >= 0.0 && f.age < f.life, "frame {frame}: {} / {}", f.age, f.life);
                assert!(f.pos.y <= f.floor);
                assert!(f.pos.is_finite());
            }
        }
        assert!(pool.resets() > 0);
    }
}
