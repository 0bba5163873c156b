//! On-demand pollen sparks emitted by open petals

use crate::pool::{DrawContext, Emitter};
use crate::rand::ParticleRng;
use blossom_core::math::clamp;
use blossom_core::{Color, Vec3};
use blossom_render::palette;
use blossom_render::{Paint, RadialGradient, Surface};

/// Downward acceleration on the depth axis
pub const GRAVITY: f32 = 60.0;

#[derive(Debug, Clone)]
pub struct Spark {
    pub active: bool,
    pub pos: Vec3,
    pub vel: Vec3,
    pub age: f32,
    pub life: f32,
    pub radius: f32,
    pub color: Color,
    pub twinkle: f32,
    pub twinkle_speed: f32,
}

impl Spark {
    fn inactive() -> Self {
        Self {
            active: false,
            pos: Vec3::ZERO,
            vel: Vec3::ZERO,
            age: 0.0,
            life: 1.0,
            radius: 1.0,
            color: palette::WHITE,
            twinkle: 0.0,
            twinkle_speed: 0.0,
        }
    }

    fn launch(&mut self, at: Vec3, rng: &mut ParticleRng) {
        let dir = rng.angle();
        let up = rng.range(0.2, 1.0);
        let speed = rng.range(28.0, 110.0) * (0.5 + up);
        self.active = true;
        self.pos = at;
        self.vel = Vec3::new(dir.cos() * speed, dir.sin() * speed, rng.range(20.0, 130.0));
        self.life = rng.range(0.9, 2.2);
        self.age = 0.0;
        self.radius = rng.range(0.8, 2.1);
        self.color = rng.pick(&[palette::WHITE, palette::LEAF, palette::ACCENT1]);
        self.twinkle = rng.angle();
        self.twinkle_speed = rng.range(2.0, 4.6);
    }

    /// Ballistic step; deactivates purely by age
    fn update(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.age += dt;
        self.twinkle += dt * self.twinkle_speed;
        self.pos = self.pos + self.vel * dt;
        self.vel.z -= GRAVITY * dt;
        if self.age >= self.life {
            self.active = false;
        }
    }

    fn draw(&self, ctx: &DrawContext, surface: &mut dyn Surface) {
        if !self.active {
            return;
        }
        let pr = ctx.project(self.pos);
        let t = clamp(1.0 - self.age / self.life, 0.0, 1.0);
        let tw = 0.65 + 0.35 * self.twinkle.sin();
        let a = 0.22 * t * tw * (1.0 - 0.35 * ctx.fog);
        let rr = self.radius * (0.65 + pr.scale);

        let glow = RadialGradient::new(pr.x, pr.y, 0.0, rr * 5.0)
            .with_stop(0.0, self.color.with_alpha(a * 1.8))
            .with_stop(0.65, palette::WHITE.with_alpha(a * 0.35))
            .with_stop(1.0, palette::WHITE.with_alpha(0.0));
        surface.fill_circle(pr.x, pr.y, rr * 5.0, &Paint::Radial(glow));
    }
}

/// Fixed-capacity pool of sparks; full pools drop spawns silently
#[derive(Debug, Clone)]
pub struct SparkPool {
    slots: Vec<Spark>,
    dropped: u64,
    dropped_frame: u32,
}

impl SparkPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![Spark::inactive(); capacity],
            dropped: 0,
            dropped_frame: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.active).count()
    }

    /// Launch into the first inactive slot
    pub fn spawn(&mut self, at: Vec3, rng: &mut ParticleRng) -> bool {
        match self.slots.iter_mut().find(|s| !s.active) {
            Some(slot) => {
                slot.launch(at, rng);
                true
            }
            None => {
                self.dropped += 1;
                self.dropped_frame += 1;
                false
            }
        }
    }

    pub fn update(&mut self, dt: f32) {
        for spark in &mut self.slots {
            spark.update(dt);
        }
    }

    pub fn draw(&self, ctx: &DrawContext, surface: &mut dyn Surface) {
        for spark in &self.slots {
            spark.draw(ctx, surface);
        }
    }

    /// Spawns dropped since creation
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Spawns dropped since the last call; logs a summary when non-zero
    pub fn take_frame_drops(&mut self) -> u32 {
        let n = std::mem::take(&mut self.dropped_frame);
        if n > 0 {
            log::trace!("[particles] spark pool full, dropped {n} spawn(s)");
        }
        n
    }

    pub fn iter(&self) -> impl Iterator<Item = &Spark> {
        self.slots.iter()
    }

    /// Deactivate every spark (new run)
    pub fn clear(&mut self) {
        for spark in &mut self.slots {
            spark.active = false;
        }
    }
}

impl Emitter for SparkPool {
    fn emit(&mut self, at: Vec3, rng: &mut ParticleRng) -> bool {
        self.spawn(at, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflowing_requests_are_dropped() {
        let mut rng = ParticleRng::new(21);
        let mut pool = SparkPool::new(260);
        let accepted = (0..400)
            .filter(|_| pool.spawn(Vec3::new(10.0, 20.0, 30.0), &mut rng))
            .count();
        assert_eq!(accepted, 260);
        assert_eq!(pool.active_count(), 260);
        assert_eq!(pool.capacity(), 260);
        assert_eq!(pool.dropped(), 140);
        assert_eq!(pool.take_frame_drops(), 140);
        assert_eq!(pool.take_frame_drops(), 0);
    }

    #[test]
    fn sparks_expire_by_age_and_free_slots() {
        let mut rng = ParticleRng::new(21);
        let mut pool = SparkPool::new(4);
        for _ in 0..4 {
            pool.spawn(Vec3::ZERO, &mut rng);
        }
        for _ in 0..100 {
            pool.update(1.0 / 30.0);
            for s in pool.iter().filter(|s| s.active) {
                assert!(s.age < s.life);
            }
        }
        assert_eq!(pool.active_count(), 0);
        assert!(pool.spawn(Vec3::ZERO, &mut rng));
    }

    #[test]
    fn gravity_bends_depth_velocity() {
        let mut rng = ParticleRng::new(21);
        let mut pool = SparkPool::new(1);
        pool.spawn(Vec3::ZERO, &mut rng);
        let vz0 = pool.iter().next().unwrap().vel.z;
        pool.update(0.1);
        let vz1 = pool.iter().next().unwrap().vel.z;
        assert!((vz0 - vz1 - GRAVITY * 0.1).abs() < 1e-4);
    }

    #[test]
    fn continuous_emission_stays_within_capacity() {
        let mut rng = ParticleRng::new(0x5EED);
        let mut pool = SparkPool::new(140);
        let mut accepted = 0u64;
        let mut requested = 0u64;
        // Eight emissions per frame for ten seconds at 60 Hz
        for frame in 0..600 {
            for i in 0..8 {
                requested += 1;
                if pool.emit(Vec3::new(i as f32, 0.0, 40.0), &mut rng) {
                    accepted += 1;
                }
            }
            pool.update(1.0 / 60.0);
            pool.take_frame_drops();
            assert_eq!(pool.capacity(), 140);
            assert!(pool.active_count() <= 140, "frame {frame}");
            for s in pool.iter().filter(|s| s.active) {
                assert!(s.age >= 0.0 && s.age < s.life);
            }
        }
        assert_eq!(accepted + pool.dropped(), requested);
        assert!(pool.dropped() > 0);
        assert!(accepted > 140);
    }
}
