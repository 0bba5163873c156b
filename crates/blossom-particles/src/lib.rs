//! Blossom Particles - Fixed-capacity particle pools
//!
//! - `ResettingPool<E>`: continuously alive entities reset in place on
//!   expiry (stars, motes, flakes, mist)
//! - `SparkPool`: on-demand sparks behind an active flag; full pools drop
//!   spawns silently
//! - `ParticleRng`: seeded xorshift32 generator shared by every pool

mod flakes;
mod mist;
mod motes;
mod pool;
mod rand;
mod sparks;
mod stars;

pub use flakes::Flake;
pub use mist::MistPuff;
pub use motes::Mote;
pub use pool::{Bounds, DrawContext, Emitter, Fate, PoolEntity, PoolSizing, ResettingPool, StepContext};
pub use rand::ParticleRng;
pub use sparks::{Spark, SparkPool};
pub use stars::Star;
