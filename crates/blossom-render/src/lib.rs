//! Blossom Render - Projection and drawing
//!
//! - `Camera` / `Projector`: orbit camera (yaw, pitch, zoom, spin) and the
//!   single 3D → 2D projection every visual element goes through
//! - `Surface`: canvas-style 2D drawing trait (solid and radial paints,
//!   circles, ellipses, lines, quadratic paths, offscreen layers)
//! - `Raster`: tiny-skia `Surface` with PNG output
//! - `palette`: the experience's color palette

mod camera;
pub mod palette;
mod raster;
mod surface;

pub use camera::{Camera, Lens, OrbitLimits, OrbitState, ProjectedPoint, Projector};
pub use raster::{Layer, Raster};
pub use surface::{ColorStop, Paint, Path, PathVerb, RadialGradient, Surface};
