//! Canvas-style drawing trait, paints and paths

use crate::raster::Layer;
use blossom_core::Color;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    /// Position along the gradient, 0..1
    pub offset: f32,
    pub color: Color,
}

/// Concentric radial gradient from `r0` to `r1` around `(cx, cy)`
///
/// Inside `r0` the first stop's color holds; past `r1` the last one does.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub cx: f32,
    pub cy: f32,
    pub r0: f32,
    pub r1: f32,
    pub stops: Vec<ColorStop>,
}

impl RadialGradient {
    pub fn new(cx: f32, cy: f32, r0: f32, r1: f32) -> Self {
        Self {
            cx,
            cy,
            r0,
            r1,
            stops: Vec::new(),
        }
    }

    /// Add a stop; stops must be added in ascending offset order
    pub fn with_stop(mut self, offset: f32, color: Color) -> Self {
        self.stops.push(ColorStop {
            offset: offset.clamp(0.0, 1.0),
            color,
        });
        self
    }

    /// Stops rescaled onto `0..r1`, so the inner radius becomes a plain offset
    pub fn stops_from_center(&self) -> Vec<ColorStop> {
        let Some(first) = self.stops.first() else {
            return Vec::new();
        };
        let inner = if self.r1 > 0.0 {
            (self.r0 / self.r1).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let mut stops = Vec::with_capacity(self.stops.len() + 1);
        if inner > 0.0 {
            stops.push(ColorStop {
                offset: 0.0,
                color: first.color,
            });
        }
        stops.extend(self.stops.iter().map(|s| ColorStop {
            offset: inner + s.offset * (1.0 - inner),
            color: s.color,
        }));
        stops
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    Radial(RadialGradient),
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Paint::Solid(color)
    }
}

impl From<RadialGradient> for Paint {
    fn from(gradient: RadialGradient) -> Self {
        Paint::Radial(gradient)
    }
}

/// Drawing commands of one path, in logical pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathVerb {
    MoveTo(f32, f32),
    LineTo(f32, f32),
    QuadTo(f32, f32, f32, f32),
    Close,
}

/// Canvas-style path; a segment with no open contour starts a new one
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    verbs: Vec<PathVerb>,
    open: bool,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.verbs.push(PathVerb::MoveTo(x, y));
        self.open = true;
        self
    }

    pub fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        if !self.open {
            return self.move_to(x, y);
        }
        self.verbs.push(PathVerb::LineTo(x, y));
        self
    }

    pub fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) -> &mut Self {
        if !self.open {
            return self.move_to(x, y);
        }
        self.verbs.push(PathVerb::QuadTo(cx, cy, x, y));
        self
    }

    pub fn close(&mut self) -> &mut Self {
        if self.open {
            self.verbs.push(PathVerb::Close);
            self.open = false;
        }
        self
    }

    pub fn verbs(&self) -> &[PathVerb] {
        &self.verbs
    }

    /// No segment to draw
    pub fn is_empty(&self) -> bool {
        !self
            .verbs
            .iter()
            .any(|v| matches!(v, PathVerb::LineTo(..) | PathVerb::QuadTo(..)))
    }

    pub fn is_finite(&self) -> bool {
        self.verbs.iter().all(|v| match *v {
            PathVerb::MoveTo(x, y) | PathVerb::LineTo(x, y) => x.is_finite() && y.is_finite(),
            PathVerb::QuadTo(cx, cy, x, y) => [cx, cy, x, y].iter().all(|c| c.is_finite()),
            PathVerb::Close => true,
        })
    }
}

/// 2D drawing target in logical pixels
///
/// Implementations ignore primitives with non-finite coordinates.
pub trait Surface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;
    fn clear(&mut self, color: Color);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, paint: &Paint);
    fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, paint: &Paint);
    fn fill_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32, rotation: f32, color: Color);
    fn stroke_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, width: f32, color: Color);
    fn fill_path(&mut self, path: &Path, paint: &Paint);
    fn stroke_path(&mut self, path: &Path, width: f32, color: Color);
    fn draw_layer(&mut self, layer: &Layer);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inner_radius_becomes_a_leading_stop() {
        let g = RadialGradient::new(0.0, 0.0, 2.0, 10.0)
            .with_stop(0.0, Color::WHITE)
            .with_stop(1.0, Color::BLACK);
        let stops = g.stops_from_center();
        assert_eq!(stops.len(), 3);
        assert_eq!(stops[0].offset, 0.0);
        assert_eq!(stops[0].color, Color::WHITE);
        assert!((stops[1].offset - 0.2).abs() < 1e-6);
        assert_eq!(stops[2].offset, 1.0);
    }

    #[test]
    fn gradient_from_center_keeps_its_stops() {
        let g = RadialGradient::new(0.0, 0.0, 0.0, 10.0)
            .with_stop(0.0, Color::WHITE)
            .with_stop(0.5, Color::BLACK);
        let stops = g.stops_from_center();
        assert_eq!(stops, g.stops);
        assert!(RadialGradient::new(0.0, 0.0, 0.0, 1.0).stops_from_center().is_empty());
    }

    #[test]
    fn quad_keeps_control_point() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0).quad_to(5.0, 10.0, 10.0, 0.0).close();
        assert_eq!(
            path.verbs(),
            &[
                PathVerb::MoveTo(0.0, 0.0),
                PathVerb::QuadTo(5.0, 10.0, 10.0, 0.0),
                PathVerb::Close
            ]
        );
        assert!(!path.is_empty());
    }

    #[test]
    fn line_after_close_starts_new_contour() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0).line_to(1.0, 0.0).close();
        path.line_to(2.0, 2.0);
        assert_eq!(path.verbs().last(), Some(&PathVerb::MoveTo(2.0, 2.0)));
    }

    #[test]
    fn lone_move_is_empty() {
        let mut path = Path::new();
        path.move_to(3.0, 3.0);
        assert!(path.is_empty());
    }

    #[test]
    fn non_finite_path_detected() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0).line_to(f32::NAN, 1.0);
        assert!(!path.is_finite());
    }
}
