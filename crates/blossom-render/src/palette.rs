//! Experience palette

use blossom_core::Color;

pub const BACKGROUND: Color = Color::rgb8(0, 0, 0);
pub const LEAF: Color = Color::rgb8(170, 255, 220);
pub const LEAF2: Color = Color::rgb8(110, 255, 170);
pub const WHITE: Color = Color::rgb8(245, 255, 252);
pub const ACCENT1: Color = Color::rgb8(150, 210, 255);
pub const ACCENT2: Color = Color::rgb8(210, 160, 255);
pub const STAMEN: Color = Color::rgb8(255, 214, 120);
pub const STAMEN2: Color = Color::rgb8(255, 185, 80);

/// Shorthand for a palette color at a given alpha
pub fn rgba(color: Color, alpha: f32) -> Color {
    color.with_alpha(alpha)
}
