//! Full-screen layers: background wash, vignette and afterglow flash

use blossom_core::{Color, Result};
use blossom_render::palette;
use blossom_render::{Layer, Paint, RadialGradient, Surface};

/// Peak alpha of the afterglow flash
pub const FLASH_ALPHA: f32 = 0.06;

pub fn draw_background(surface: &mut dyn Surface) {
    surface.clear(palette::BACKGROUND);
}

/// Pre-rendered vignette for a viewport
pub fn build_vignette(width: u32, height: u32, dpr: f32) -> Result<Layer> {
    let mut layer = Layer::new(width, height, dpr)?;
    let surface = layer.surface();
    let (w, h) = (surface.width(), surface.height());
    let shade = RadialGradient::new(w * 0.5, h * 0.5, w.min(h) * 0.1, w.max(h) * 0.78)
        .with_stop(0.0, Color::BLACK.with_alpha(0.0))
        .with_stop(1.0, Color::BLACK.with_alpha(0.78));
    surface.fill_rect(0.0, 0.0, w, h, &Paint::Radial(shade));
    Ok(layer)
}

/// White flash fading out over the afterglow
pub fn draw_flash(surface: &mut dyn Surface, afterglow: f32) {
    let a = FLASH_ALPHA * (1.0 - afterglow);
    if a > 1e-4 {
        let (w, h) = (surface.width(), surface.height());
        surface.fill_rect(0.0, 0.0, w, h, &Paint::Solid(Color::WHITE.with_alpha(a)));
    }
}
