//! The bloom: concentric petal layers with staggered reveal

use crate::config::BloomConfig;
use blossom_core::math::{clamp, ease_in_out_cubic, lerp, smoothstep, TAU};
use blossom_core::{Color, Vec3};
use blossom_particles::{DrawContext, Emitter, ParticleRng};
use blossom_render::palette;
use blossom_render::{Paint, Path, RadialGradient, Surface};
use std::f32::consts::FRAC_PI_2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BloomState {
    /// Before the bloom phase; not drawn
    Dormant,
    /// Bloom progress rising
    Opening,
    /// Bloom progress pinned at 1; only the glow fade changes
    Open,
}

#[derive(Debug, Clone)]
pub struct Petal {
    pub layer: usize,
    pub slot: usize,
    pub slots: usize,
    pub base_angle: f32,
    pub base_radius: f32,
    pub base_z: f32,
    pub length: f32,
    pub width: f32,
    pub openness: f32,
    pub wobble: f32,
    pub wobble_speed: f32,
    pub jitter: f32,
    pub main: Color,
    pub accent: Color,
    pub wave_seed: f32,
}

/// World-space outline of one petal for the current frame
struct PetalShape {
    base: Vec3,
    left: Vec3,
    tip: Vec3,
    right: Vec3,
}

impl Petal {
    fn new(layer: usize, layers: usize, slot: usize, slots: usize, rng: &mut ParticleRng) -> Self {
        let f = if layers > 1 {
            layer as f32 / (layers - 1) as f32
        } else {
            0.0
        };
        let base_angle = (slot as f32 / slots as f32) * TAU + rng.range(-0.03, 0.03);
        let base_radius = lerp(28.0, 160.0, f) * rng.range(0.92, 1.08);
        let base_z = lerp(-45.0, 120.0, f) + rng.range(-18.0, 18.0);
        let length = lerp(78.0, 182.0, f) * rng.range(0.86, 1.10);
        let width = lerp(30.0, 96.0, f) * rng.range(0.82, 1.22);
        let wobble = rng.angle();
        let wobble_speed = rng.range(0.7, 1.9);
        let jitter = rng.range(0.7, 2.2);
        let main = if rng.chance(0.58) { palette::WHITE } else { palette::LEAF };
        let accent = if rng.chance(0.22) {
            rng.pick(&[palette::ACCENT1, palette::ACCENT2])
        } else {
            main
        };
        Self {
            layer,
            slot,
            slots,
            base_angle,
            base_radius,
            base_z,
            length,
            width,
            openness: 0.0,
            wobble,
            wobble_speed,
            jitter,
            main,
            accent,
            wave_seed: rng.next_f32(),
        }
    }

    /// Openness for a bloom progress; non-decreasing in `bloom`
    pub fn openness_at(&self, bloom: f32, layer_delay: f32) -> f32 {
        let delay = self.layer as f32 * layer_delay;
        let wave = 0.26 * (self.slot as f32 / self.slots as f32) + 0.10 * self.wave_seed;

        let burst = clamp(
            0.55 * smoothstep(0.10, 0.32, bloom)
                + 0.30 * smoothstep(0.36, 0.64, bloom)
                + 0.15 * smoothstep(0.68, 0.98, bloom),
            0.0,
            1.0,
        );
        let span = (1.0 - delay).max(1e-3);
        let t = clamp((bloom - delay - wave) / span, 0.0, 1.0);
        ease_in_out_cubic(t) * (0.62 + 0.38 * burst)
    }

    fn update(&mut self, dt: f32, bloom: f32, layer_delay: f32, residue: f32) {
        self.openness = self.openness_at(bloom, layer_delay);
        self.wobble += dt * self.wobble_speed * (0.7 + 0.6 * residue);
    }

    fn shape(&self, bloom_scale: f32, residue: f32) -> PetalShape {
        let open = self.openness;
        let ang = self.base_angle + residue * 0.28 * (self.wobble * 0.9).sin();
        let (sn, cs) = ang.sin_cos();

        let r = self.base_radius * bloom_scale * (0.16 + 0.84 * open);
        let z0 = self.base_z * bloom_scale + (1.0 - open) * 55.0;
        let tip_r = r + self.length * bloom_scale * (0.20 + 0.80 * open);
        let z_tip = z0 + (55.0 + 150.0 * open) * bloom_scale;

        let (ss, sc) = (ang + FRAC_PI_2).sin_cos();
        let half_w = self.width * bloom_scale * (0.34 + 0.66 * open);
        let (wx, wy) = (sc * half_w, ss * half_w);

        let base = Vec3::new(cs * r, sn * r, z0);
        let tip = Vec3::new(cs * tip_r, sn * tip_r, z_tip);
        let mid = base.lerp(&tip, 0.56);
        let mid_z = mid.z + (65.0 + 70.0 * self.wobble.sin()) * open * bloom_scale;
        PetalShape {
            base,
            left: Vec3::new(mid.x + wx, mid.y + wy, mid_z),
            tip,
            right: Vec3::new(mid.x - wx, mid.y - wy, mid_z),
        }
    }

    /// Tip position, where pollen leaves the petal; `residue` matches the drawn wobble
    pub fn tip(&self, bloom_scale: f32, residue: f32) -> Vec3 {
        self.shape(bloom_scale, residue).tip
    }

    /// Depth of the petal base, for back-to-front ordering
    fn sort_depth(&self, ctx: &DrawContext, bloom_scale: f32) -> f32 {
        let open = self.openness;
        let r = self.base_radius * bloom_scale * (0.2 + 0.8 * open);
        let (sn, cs) = self.base_angle.sin_cos();
        let z0 = self.base_z * bloom_scale + (1.0 - open) * 40.0;
        ctx.project(Vec3::new(cs * r, sn * r, z0)).depth
    }

    fn draw(&self, ctx: &DrawContext, surface: &mut dyn Surface, rng: &mut ParticleRng, look: &BloomLook) {
        let open = self.openness;
        let shape = self.shape(look.scale, look.draw_residue);
        let p0 = ctx.project(shape.base);
        let p1 = ctx.project(shape.left);
        let p2 = ctx.project(shape.tip);
        let p3 = ctx.project(shape.right);

        let depth_norm = clamp((p0.depth - 200.0) / 900.0, 0.0, 1.0);
        let a = (0.11 + 0.30 * open) * (0.75 + 0.25 * (1.0 - depth_norm)) * look.glow_fade;

        let gx = (p0.x + p2.x) * 0.5;
        let gy = (p0.y + p2.y) * 0.5;
        let gr = (p2.x - p0.x).hypot(p2.y - p0.y).max(12.0) * 0.55;

        let fill = RadialGradient::new(gx, gy, 0.0, gr)
            .with_stop(0.0, self.main.with_alpha(clamp(0.16 + 0.30 * open, 0.0, 0.58) * a * 2.0))
            .with_stop(0.55, self.accent.with_alpha(clamp(0.08 + 0.20 * open, 0.0, 0.36) * a * 1.7))
            .with_stop(1.0, palette::WHITE.with_alpha(0.0));

        let mut outline = Path::new();
        outline
            .move_to(p0.x, p0.y)
            .quad_to(p1.x, p1.y, p2.x, p2.y)
            .quad_to(p3.x, p3.y, p0.x, p0.y)
            .close();
        surface.fill_path(&outline, &Paint::Radial(fill));

        let rim = 0.18 * a * (0.6 + 0.4 * (self.wobble * 1.6).sin());
        surface.stroke_path(&outline, (1.35 * (p0.scale + 0.25)).max(0.6), palette::WHITE.with_alpha(rim));

        if open > 0.34 {
            let halo = RadialGradient::new(gx, gy, 0.0, gr * 1.95)
                .with_stop(0.0, palette::LEAF.with_alpha(0.06 * a * 3.1))
                .with_stop(0.55, palette::ACCENT2.with_alpha(0.03 * a * 3.0))
                .with_stop(1.0, palette::WHITE.with_alpha(0.0));
            surface.fill_circle(gx, gy, gr * 1.95, &Paint::Radial(halo));
        }

        if open > 0.18 && rng.chance(0.14) {
            let ex = lerp(p1.x, p2.x, rng.next_f32());
            let ey = lerp(p1.y, p2.y, rng.next_f32());
            let rr = rng.range(0.6, 1.8) * (0.7 + p0.scale);
            let jx = rng.range(-self.jitter, self.jitter);
            let jy = rng.range(-self.jitter, self.jitter);
            surface.fill_circle(ex + jx, ey + jy, rr, &Paint::Solid(palette::LEAF.with_alpha(0.10 * a * 5.3)));
        }
    }
}

/// Per-frame global look of the bloom
struct BloomLook {
    scale: f32,
    draw_residue: f32,
    glow_fade: f32,
}

/// Bloom scale for a bloom progress
pub fn bloom_scale(bloom: f32) -> f32 {
    lerp(0.52, 1.0, bloom)
}

/// Leftover vortex motion in the petals while opening
pub fn swirl_residue(bloom: f32) -> f32 {
    lerp(0.62, 0.04, bloom)
}

/// Angular wobble petals are drawn with, and emit sparks from
pub fn draw_residue(bloom: f32) -> f32 {
    lerp(0.32, 0.05, bloom)
}

#[derive(Debug, Clone)]
pub struct Bloom {
    petals: Vec<Petal>,
    state: BloomState,
    layer_delay: f32,
    emit_probability: f32,
    emit_openness: f32,
    progress: f32,
    emitted: u64,
}

impl Bloom {
    pub fn new(config: &BloomConfig, rng: &mut ParticleRng) -> Self {
        let mut bloom = Self {
            petals: Vec::new(),
            state: BloomState::Dormant,
            layer_delay: 0.0,
            emit_probability: 0.0,
            emit_openness: 1.0,
            progress: 0.0,
            emitted: 0,
        };
        bloom.rebuild(config, rng);
        bloom
    }

    /// Regenerate every petal and return to Dormant (new run)
    pub fn rebuild(&mut self, config: &BloomConfig, rng: &mut ParticleRng) {
        let layers = config.layers.len();
        self.petals.clear();
        for (layer, &count) in config.layers.iter().enumerate() {
            for slot in 0..count {
                self.petals.push(Petal::new(layer, layers, slot, count, rng));
            }
        }
        self.petals.sort_by(|a, b| a.base_z.total_cmp(&b.base_z));
        self.state = BloomState::Dormant;
        self.layer_delay = config.layer_delay;
        self.emit_probability = config.emit_probability;
        self.emit_openness = config.emit_openness;
        self.progress = 0.0;
        self.emitted = 0;
    }

    pub fn state(&self) -> BloomState {
        self.state
    }

    pub fn petals(&self) -> &[Petal] {
        &self.petals
    }

    /// Spark emissions accepted so far
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Advance the bloom. Emission happens here, never while drawing,
    /// and only for a non-zero step.
    pub fn update(
        &mut self,
        dt: f32,
        bloom: f32,
        active: bool,
        emitter: &mut dyn Emitter,
        rng: &mut ParticleRng,
    ) {
        if self.state == BloomState::Dormant {
            if !active {
                return;
            }
            self.state = BloomState::Opening;
            log::debug!("[bloom] opening");
        }
        // Progress never runs backwards within a run
        self.progress = self.progress.max(clamp(bloom, 0.0, 1.0));
        if self.state == BloomState::Opening && self.progress >= 1.0 {
            self.state = BloomState::Open;
            log::debug!("[bloom] fully open");
        }

        let residue = swirl_residue(self.progress);
        let tip_residue = draw_residue(self.progress);
        let scale = bloom_scale(self.progress);
        for petal in &mut self.petals {
            petal.update(dt, self.progress, self.layer_delay, residue);
            if dt > 0.0
                && petal.openness > self.emit_openness
                && rng.chance(self.emit_probability)
                && emitter.emit(petal.tip(scale, tip_residue), rng)
            {
                self.emitted += 1;
            }
        }
    }

    /// Painter's order: farthest petals first
    pub fn draw_order(&self, ctx: &DrawContext) -> Vec<usize> {
        let scale = bloom_scale(self.progress);
        let mut order: Vec<(usize, f32)> = self
            .petals
            .iter()
            .enumerate()
            .map(|(i, p)| (i, p.sort_depth(ctx, scale)))
            .collect();
        order.sort_by(|a, b| b.1.total_cmp(&a.1));
        order.into_iter().map(|(i, _)| i).collect()
    }

    pub fn draw(&self, ctx: &DrawContext, surface: &mut dyn Surface, rng: &mut ParticleRng, glow_fade: f32) {
        if self.state == BloomState::Dormant {
            return;
        }
        let look = BloomLook {
            scale: bloom_scale(self.progress),
            draw_residue: draw_residue(self.progress),
            glow_fade,
        };
        for i in self.draw_order(ctx) {
            self.petals[i].draw(ctx, surface, rng, &look);
        }
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }
}
