//! Core glow, stamens and heart glow

use blossom_core::math::{clamp, ease_in_out_cubic, ease_out_cubic, lerp, smoothstep, TAU};
use blossom_particles::ParticleRng;
use blossom_render::palette;
use blossom_render::{Paint, RadialGradient, Surface};
use blossom_runtime::ControlScalars;

/// First phase in which the core is drawn
pub const CORE_PHASE: usize = 2;

/// Target core size (fraction of the short viewport side) per phase
pub fn core_growth(phase: usize, local_t: f32) -> f32 {
    match phase {
        0 | 1 => 0.0,
        2 => smoothstep(0.12, 1.0, local_t) * 0.78,
        3 => lerp(0.78, 1.0, ease_in_out_cubic(local_t)),
        _ => 1.0,
    }
}

/// Global glow multiplier; fades during the final phase
pub fn glow_fade(phase: usize, last_phase: usize, afterglow: f32) -> f32 {
    if phase == last_phase {
        lerp(1.0, 0.33, afterglow)
    } else {
        1.0
    }
}

pub fn phase_glow(phase: usize) -> f32 {
    match phase {
        2 => 0.35,
        3 => 0.55,
        _ => 0.25,
    }
}

/// Smoothed core state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoreGlow {
    pub radius: f32,
    pub energy: f32,
    pub pulse: f32,
}

impl CoreGlow {
    /// Ease toward this frame's targets; a zero step leaves it frozen
    pub fn update(&mut self, dt: f32, scalars: &ControlScalars, growth: f32, min_side: f32) {
        if dt <= 0.0 {
            return;
        }
        let target_r = lerp(0.0, min_side * 0.092, growth);
        self.radius = lerp(self.radius, target_r, (0.06 + dt * 2.6).min(1.0));
        let target_e = clamp(scalars.swirl * 1.1 + scalars.pull * 0.35, 0.0, 1.0);
        self.energy = lerp(self.energy, target_e, (0.08 + dt * 1.8).min(1.0));
        self.pulse = (self.pulse + dt * (2.0 + 9.0 * self.energy)) % TAU;
    }

    /// Radius including the heartbeat
    pub fn pulsed_radius(&self) -> f32 {
        self.radius * (1.0 + 0.08 * self.pulse.sin())
    }

    pub fn draw(&self, surface: &mut dyn Surface, center: (f32, f32), phase_glow: f32) {
        let r = self.pulsed_radius();
        if r <= 0.0 {
            return;
        }
        let (cx, cy) = center;
        let glow = clamp(self.energy * 0.9 + phase_glow, 0.0, 1.0);

        surface.fill_circle(cx, cy, r * 0.35, &Paint::Solid(palette::WHITE.with_alpha(0.20 + 0.28 * glow)));

        let inner = RadialGradient::new(cx, cy, r * 0.10, r * 1.25)
            .with_stop(0.0, palette::WHITE.with_alpha(0.16 + 0.30 * glow))
            .with_stop(0.6, palette::LEAF.with_alpha(0.08 + 0.18 * glow))
            .with_stop(1.0, palette::ACCENT2.with_alpha(0.0));
        surface.fill_circle(cx, cy, r * 1.25, &Paint::Radial(inner));

        let outer = RadialGradient::new(cx, cy, r * 0.35, r * 3.2)
            .with_stop(0.0, palette::LEAF.with_alpha(0.06 + 0.14 * glow))
            .with_stop(0.7, palette::ACCENT1.with_alpha(0.03 + 0.10 * glow))
            .with_stop(1.0, palette::WHITE.with_alpha(0.0));
        surface.fill_circle(cx, cy, r * 3.2, &Paint::Radial(outer));
    }
}

/// Golden filaments with glowing tips around the bloom's heart
pub fn draw_stamens(
    surface: &mut dyn Surface,
    center: (f32, f32),
    base_r: f32,
    bloom: f32,
    fade: f32,
    count: usize,
    rng: &mut ParticleRng,
) {
    if base_r <= 0.0 || count == 0 {
        return;
    }
    let (cx, cy) = center;
    let t = ease_out_cubic(bloom);
    let len = base_r * 0.55 * (0.35 + 0.65 * t);
    let spread = base_r * 0.42 * (0.25 + 0.75 * t);

    let halo = RadialGradient::new(cx, cy, 0.0, base_r * 1.25)
        .with_stop(0.0, palette::STAMEN.with_alpha(0.11 * fade))
        .with_stop(0.6, palette::STAMEN2.with_alpha(0.06 * fade))
        .with_stop(1.0, palette::WHITE.with_alpha(0.0));
    surface.fill_circle(cx, cy, base_r * 1.25, &Paint::Radial(halo));

    let filament = palette::STAMEN2.with_alpha(0.10 * fade * (0.25 + 0.75 * t));
    for i in 0..count {
        let a = (i as f32 / count as f32) * TAU + 0.25 * (i as f32 * 0.7).sin();
        let r0 = spread * (0.18 + 0.82 * rng.next_f32());
        let (sn, cs) = a.sin_cos();
        let (x0, y0) = (cx + cs * r0, cy + sn * r0);
        let (x1, y1) = (cx + cs * (r0 + len), cy + sn * (r0 + len));
        surface.stroke_line(x0, y0, x1, y1, 1.0, filament);

        let dot_r = 1.2 + 1.8 * rng.next_f32();
        let tip = RadialGradient::new(x1, y1, 0.0, dot_r * 5.0)
            .with_stop(0.0, palette::STAMEN.with_alpha(0.24 * fade))
            .with_stop(0.55, palette::STAMEN2.with_alpha(0.13 * fade))
            .with_stop(1.0, palette::WHITE.with_alpha(0.0));
        surface.fill_circle(x1, y1, dot_r * 5.0, &Paint::Radial(tip));
    }
}

/// Soft white glow over the bloom's heart
pub fn draw_heart(surface: &mut dyn Surface, center: (f32, f32), core_r: f32, fade: f32) {
    if core_r <= 0.0 {
        return;
    }
    let (cx, cy) = center;
    let heart = RadialGradient::new(cx, cy, 0.0, core_r * 1.25)
        .with_stop(0.0, palette::WHITE.with_alpha(0.12 * fade))
        .with_stop(0.6, palette::LEAF.with_alpha(0.08 * fade))
        .with_stop(1.0, palette::ACCENT2.with_alpha(0.0));
    surface.fill_circle(cx, cy, core_r * 1.25, &Paint::Radial(heart));
}
