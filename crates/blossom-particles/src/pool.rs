//! Fixed-capacity pools
//!
//! Two storage policies: `ResettingPool` keeps every slot alive and
//! re-spawns expired entities in place, `SparkPool` holds on-demand entities
//! behind an active flag. Neither ever grows.

use crate::rand::ParticleRng;
use blossom_core::Vec3;
use blossom_render::{ProjectedPoint, Projector, Surface};
use blossom_runtime::ControlScalars;
use serde::{Deserialize, Serialize};

/// Logical viewport the pools are sized for
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    pub fn min_side(&self) -> f32 {
        self.width.min(self.height)
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.width * 0.5, self.height * 0.5)
    }
}

/// Area-proportional entity count: `clamp(area / divisor, min, max)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoolSizing {
    pub divisor: f32,
    pub min: usize,
    pub max: usize,
}

impl PoolSizing {
    pub const fn new(divisor: f32, min: usize, max: usize) -> Self {
        Self { divisor, min, max }
    }

    pub fn count(&self, bounds: &Bounds) -> usize {
        let raw = if self.divisor > 0.0 {
            (bounds.area() / self.divisor) as usize
        } else {
            self.max
        };
        raw.clamp(self.min, self.max.max(self.min))
    }
}

/// Everything an update step may read
#[derive(Debug, Clone, Copy)]
pub struct StepContext {
    pub dt: f32,
    pub scalars: ControlScalars,
    pub bounds: Bounds,
}

/// Everything a draw step may read
#[derive(Debug, Clone, Copy)]
pub struct DrawContext {
    pub projector: Projector,
    /// Screen-space projection origin
    pub origin: (f32, f32),
    pub scalars: ControlScalars,
    /// Fog density this layer is drawn at
    pub fog: f32,
}

impl DrawContext {
    pub fn new(projector: Projector, origin: (f32, f32), scalars: ControlScalars) -> Self {
        Self {
            projector,
            origin,
            scalars,
            fog: scalars.fog,
        }
    }

    pub fn with_fog(mut self, fog: f32) -> Self {
        self.fog = fog;
        self
    }

    pub fn project(&self, p: Vec3) -> ProjectedPoint {
        self.projector.project(p, self.origin)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fate {
    Alive,
    Expired,
}

/// An entity that lives in a `ResettingPool`
pub trait PoolEntity: Sized {
    /// Fresh entity; `initial` is true when the pool is first seeded
    fn spawn(rng: &mut ParticleRng, bounds: &Bounds, initial: bool) -> Self;

    fn update(&mut self, ctx: &StepContext, rng: &mut ParticleRng) -> Fate;

    fn draw(&self, ctx: &DrawContext, surface: &mut dyn Surface, rng: &mut ParticleRng);

    /// `(age, life)` for aging entities
    fn lifetime(&self) -> Option<(f32, f32)> {
        None
    }
}

/// Pool whose length only changes through `reseed`
#[derive(Debug, Clone)]
pub struct ResettingPool<E> {
    entities: Vec<E>,
    resets: u64,
}

impl<E: PoolEntity> ResettingPool<E> {
    pub fn new(count: usize, rng: &mut ParticleRng, bounds: &Bounds) -> Self {
        let mut pool = Self {
            entities: Vec::new(),
            resets: 0,
        };
        pool.reseed(count, rng, bounds);
        pool
    }

    /// Rebuild with a new count (viewport change)
    pub fn reseed(&mut self, count: usize, rng: &mut ParticleRng, bounds: &Bounds) {
        self.entities.clear();
        self.entities.reserve_exact(count);
        for _ in 0..count {
            self.entities.push(E::spawn(rng, bounds, true));
        }
    }

    /// Step every entity; expired ones are re-spawned in the same call
    pub fn update(&mut self, ctx: &StepContext, rng: &mut ParticleRng) {
        for entity in &mut self.entities {
            if entity.update(ctx, rng) == Fate::Expired {
                *entity = E::spawn(rng, &ctx.bounds, false);
                self.resets += 1;
            }
        }
    }

    pub fn draw(&self, ctx: &DrawContext, surface: &mut dyn Surface, rng: &mut ParticleRng) {
        for entity in &self.entities {
            entity.draw(ctx, surface, rng);
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.entities.iter()
    }

    /// Total in-place resets since creation
    pub fn resets(&self) -> u64 {
        self.resets
    }
}

/// Receiver of composite-structure emissions
pub trait Emitter {
    /// Returns false when the spawn was dropped
    fn emit(&mut self, at: Vec3, rng: &mut ParticleRng) -> bool;
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn step(dt: f32, scalars: ControlScalars) -> StepContext {
        StepContext {
            dt,
            scalars,
            bounds: Bounds::new(1280.0, 720.0),
        }
    }

    struct Ticker {
        age: f32,
        life: f32,
    }

    impl PoolEntity for Ticker {
        fn spawn(rng: &mut ParticleRng, _bounds: &Bounds, _initial: bool) -> Self {
            let life = rng.range(0.5, 1.0);
            Self {
                age: rng.range(0.0, life),
                life,
            }
        }

        fn update(&mut self, ctx: &StepContext, _rng: &mut ParticleRng) -> Fate {
            self.age += ctx.dt;
            if self.age >= self.life {
                Fate::Expired
            } else {
                Fate::Alive
            }
        }

        fn draw(&self, _ctx: &DrawContext, _surface: &mut dyn Surface, _rng: &mut ParticleRng) {}

        fn lifetime(&self) -> Option<(f32, f32)> {
            Some((self.age, self.life))
        }
    }

    #[test]
    fn sizing_clamps_area() {
        let stars = PoolSizing::new(1500.0, 560, 1200);
        assert_eq!(stars.count(&Bounds::new(100.0, 100.0)), 560);
        assert_eq!(stars.count(&Bounds::new(1280.0, 720.0)), 614);
        assert_eq!(stars.count(&Bounds::new(3840.0, 2160.0)), 1200);
    }

    #[test]
    fn resetting_pool_keeps_length_and_ages() {
        let mut rng = ParticleRng::new(11);
        let bounds = Bounds::new(800.0, 600.0);
        let mut pool: ResettingPool<Ticker> = ResettingPool::new(64, &mut rng, &bounds);
        let ctx = step(1.0 / 30.0, ControlScalars::default());
        for _ in 0..600 {
            pool.update(&ctx, &mut rng);
            assert_eq!(pool.len(), 64);
            for t in pool.iter() {
                let (age, life) = t.lifetime().unwrap();
                assert!(age >= 0.0 && age < life);
            }
        }
        assert!(pool.resets() > 0);
    }

    #[test]
    fn reseed_changes_length() {
        let mut rng = ParticleRng::new(3);
        let bounds = Bounds::new(800.0, 600.0);
        let mut pool: ResettingPool<Ticker> = ResettingPool::new(10, &mut rng, &bounds);
        pool.reseed(25, &mut rng, &bounds);
        assert_eq!(pool.len(), 25);
    }
}
