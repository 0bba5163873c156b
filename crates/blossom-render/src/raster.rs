//! `Surface` backed by a tiny-skia pixmap

use crate::surface::{Paint, Path, PathVerb, RadialGradient, Surface};
use blossom_core::{BlossomError, Color, Result};
use image::{Rgba, RgbaImage};
use std::path::Path as FsPath;
use tiny_skia::{
    FillRule, GradientStop, LineCap, LineJoin, PathBuilder, Pixmap, PixmapPaint, Point, Rect, Shader, SpreadMode,
    Stroke, Transform,
};

/// Largest device dimension a raster will allocate
const MAX_DEVICE_DIM: u32 = 8192;

/// Premultiplied pixmap in device pixels, addressed in logical pixels
#[derive(Debug, Clone)]
pub struct Raster {
    pixmap: Pixmap,
    width: f32,
    height: f32,
    dpr: f32,
}

fn device_dim(logical: u32, dpr: f32) -> u32 {
    ((logical as f32 * dpr).round() as u32).clamp(1, MAX_DEVICE_DIM)
}

fn finite(values: &[f32]) -> bool {
    values.iter().all(|v| v.is_finite())
}

fn sk_color(c: Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba(
        c.r.clamp(0.0, 1.0),
        c.g.clamp(0.0, 1.0),
        c.b.clamp(0.0, 1.0),
        c.a.clamp(0.0, 1.0),
    )
    .unwrap_or(tiny_skia::Color::TRANSPARENT)
}

fn radial_shader(g: &RadialGradient) -> Option<Shader<'static>> {
    let stops: Vec<GradientStop> = g
        .stops_from_center()
        .into_iter()
        .map(|s| GradientStop::new(s.offset, sk_color(s.color)))
        .collect();
    if stops.is_empty() || !finite(&[g.cx, g.cy, g.r0, g.r1]) {
        return None;
    }
    if g.r1 <= 0.0 {
        return g.stops.last().map(|s| Shader::SolidColor(sk_color(s.color)));
    }
    let center = Point::from_xy(g.cx, g.cy);
    tiny_skia::RadialGradient::new(center, center, g.r1, stops, SpreadMode::Pad, Transform::identity())
}

fn sk_paint(paint: &Paint) -> Option<tiny_skia::Paint<'static>> {
    let shader = match paint {
        Paint::Solid(c) => Shader::SolidColor(sk_color(*c)),
        Paint::Radial(g) => radial_shader(g)?,
    };
    Some(tiny_skia::Paint {
        shader,
        anti_alias: true,
        ..tiny_skia::Paint::default()
    })
}

fn solid(color: Color) -> tiny_skia::Paint<'static> {
    let mut paint = tiny_skia::Paint::default();
    paint.set_color(sk_color(color));
    paint.anti_alias = true;
    paint
}

fn round_stroke(width: f32) -> Stroke {
    Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    }
}

fn build_path(path: &Path) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for verb in path.verbs() {
        match *verb {
            PathVerb::MoveTo(x, y) => pb.move_to(x, y),
            PathVerb::LineTo(x, y) => pb.line_to(x, y),
            PathVerb::QuadTo(cx, cy, x, y) => pb.quad_to(cx, cy, x, y),
            PathVerb::Close => pb.close(),
        }
    }
    pb.finish()
}

impl Raster {
    pub fn new(width: u32, height: u32, dpr: f32) -> Result<Self> {
        let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        let width = width.max(1);
        let height = height.max(1);
        let (dw, dh) = (device_dim(width, dpr), device_dim(height, dpr));
        let pixmap =
            Pixmap::new(dw, dh).ok_or_else(|| BlossomError::ImageError(format!("cannot allocate {dw}x{dh} raster")))?;
        Ok(Self {
            pixmap,
            width: width as f32,
            height: height as f32,
            dpr,
        })
    }

    /// Reallocate for a new viewport; contents are discarded
    pub fn resize(&mut self, width: u32, height: u32, dpr: f32) -> Result<()> {
        *self = Self::new(width, height, dpr)?;
        Ok(())
    }

    pub fn dpr(&self) -> f32 {
        self.dpr
    }

    pub fn device_size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    /// Straight-alpha RGBA8 copy of the device pixels
    pub fn to_image(&self) -> RgbaImage {
        let (w, h) = self.device_size();
        RgbaImage::from_fn(w, h, |x, y| {
            self.pixmap.pixel(x, y).map_or(Rgba([0, 0, 0, 0]), |p| {
                let c = p.demultiply();
                Rgba([c.red(), c.green(), c.blue(), c.alpha()])
            })
        })
    }

    pub fn save_png(&self, path: impl AsRef<FsPath>) -> Result<()> {
        let path = path.as_ref();
        self.to_image()
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| BlossomError::ImageError(format!("{}: {e}", path.display())))?;
        log::debug!("[render] wrote {}", path.display());
        Ok(())
    }

    /// Logical to device pixels
    fn transform(&self) -> Transform {
        Transform::from_scale(self.dpr, self.dpr)
    }
}

impl Surface for Raster {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn clear(&mut self, color: Color) {
        self.pixmap.fill(sk_color(color));
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, paint: &Paint) {
        if !finite(&[x, y, w, h]) || w <= 0.0 || h <= 0.0 {
            return;
        }
        let (Some(rect), Some(paint)) = (Rect::from_xywh(x, y, w, h), sk_paint(paint)) else {
            return;
        };
        let ts = self.transform();
        self.pixmap.fill_rect(rect, &paint, ts, None);
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, paint: &Paint) {
        if !finite(&[cx, cy, r]) || r <= 0.0 {
            return;
        }
        let (Some(circle), Some(paint)) = (PathBuilder::from_circle(cx, cy, r), sk_paint(paint)) else {
            return;
        };
        let ts = self.transform();
        self.pixmap.fill_path(&circle, &paint, FillRule::Winding, ts, None);
    }

    fn fill_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32, rotation: f32, color: Color) {
        if !finite(&[cx, cy, rx, ry, rotation]) || rx <= 0.0 || ry <= 0.0 {
            return;
        }
        let Some(oval) = Rect::from_xywh(-rx, -ry, rx * 2.0, ry * 2.0).and_then(PathBuilder::from_oval) else {
            return;
        };
        // Rotate about the center, move into place, then scale to device pixels
        let (s, c) = rotation.sin_cos();
        let d = self.dpr;
        let ts = Transform::from_row(c * d, s * d, -s * d, c * d, cx * d, cy * d);
        self.pixmap.fill_path(&oval, &solid(color), FillRule::Winding, ts, None);
    }

    fn stroke_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, width: f32, color: Color) {
        if !finite(&[x0, y0, x1, y1, width]) || width <= 0.0 {
            return;
        }
        let mut pb = PathBuilder::new();
        pb.move_to(x0, y0);
        pb.line_to(x1, y1);
        let Some(line) = pb.finish() else {
            return;
        };
        let ts = self.transform();
        self.pixmap.stroke_path(&line, &solid(color), &round_stroke(width), ts, None);
    }

    fn fill_path(&mut self, path: &Path, paint: &Paint) {
        if path.is_empty() || !path.is_finite() {
            return;
        }
        let (Some(shape), Some(paint)) = (build_path(path), sk_paint(paint)) else {
            return;
        };
        let ts = self.transform();
        self.pixmap.fill_path(&shape, &paint, FillRule::Winding, ts, None);
    }

    fn stroke_path(&mut self, path: &Path, width: f32, color: Color) {
        if path.is_empty() || !path.is_finite() || !width.is_finite() || width <= 0.0 {
            return;
        }
        let Some(shape) = build_path(path) else {
            return;
        };
        let ts = self.transform();
        self.pixmap.stroke_path(&shape, &solid(color), &round_stroke(width), ts, None);
    }

    fn draw_layer(&mut self, layer: &Layer) {
        let (sw, sh) = layer.device_size();
        let (dw, dh) = self.device_size();
        let ts = if (sw, sh) == (dw, dh) {
            Transform::identity()
        } else {
            Transform::from_scale(dw as f32 / sw as f32, dh as f32 / sh as f32)
        };
        self.pixmap
            .draw_pixmap(0, 0, layer.raster.pixmap.as_ref(), &PixmapPaint::default(), ts, None);
    }
}

/// Offscreen image composited with `Surface::draw_layer`
#[derive(Debug, Clone)]
pub struct Layer {
    raster: Raster,
}

impl Layer {
    /// Transparent layer matching a viewport
    pub fn new(width: u32, height: u32, dpr: f32) -> Result<Self> {
        Ok(Self {
            raster: Raster::new(width, height, dpr)?,
        })
    }

    /// Draw into the layer
    pub fn surface(&mut self) -> &mut Raster {
        &mut self.raster
    }

    pub fn device_size(&self) -> (u32, u32) {
        self.raster.device_size()
    }
}
