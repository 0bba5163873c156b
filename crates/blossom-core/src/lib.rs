//! Blossom Core - Foundational types for the blossom animation engine
//!
//! This crate provides the types every other blossom crate depends on:
//! - `Vec3`, `Color` - Spatial and color types
//! - `math` - Clamp, interpolation and the easing curves used by the timeline
//! - Error types and Result alias

mod error;
pub mod math;
mod types;

pub use error::{BlossomError, Result};
pub use math::Easing;
pub use types::{Color, Vec3};
