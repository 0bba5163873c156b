//! Orbit camera and perspective projector

use blossom_core::math::{lerp, TAU};
use blossom_core::Vec3;
use serde::{Deserialize, Serialize};

/// Bounds and sensitivities for orbit input and auto-rotation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitLimits {
    pub pitch_min: f32,
    pub pitch_max: f32,
    pub zoom_min: f32,
    pub zoom_max: f32,
    /// Radians of yaw per pixel of horizontal drag
    pub drag_yaw: f32,
    /// Radians of pitch per pixel of vertical drag
    pub drag_pitch: f32,
    /// Fractional zoom change per wheel notch
    pub wheel_step: f32,
    /// Seconds per full auto-rotation
    pub rotation_period: f32,
}

impl Default for OrbitLimits {
    fn default() -> Self {
        Self {
            pitch_min: -0.95,
            pitch_max: 0.28,
            zoom_min: 0.7,
            zoom_max: 1.6,
            drag_yaw: 0.006,
            drag_pitch: 0.004,
            wheel_step: 0.06,
            rotation_period: 18.0,
        }
    }
}

/// Viewpoint state mutated by input and auto-rotation
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitState {
    /// Radians, wrapped to [0, TAU)
    pub yaw: f32,
    /// Radians, clamped to the limits
    pub pitch: f32,
    /// Clamped to the limits
    pub zoom: f32,
    pub auto_rotate: bool,
    pub dragging: bool,
    pub limits: OrbitLimits,
}

impl Default for OrbitState {
    fn default() -> Self {
        Self::new(0.0, -0.18, 1.0, OrbitLimits::default())
    }
}

impl OrbitState {
    pub fn new(yaw: f32, pitch: f32, zoom: f32, limits: OrbitLimits) -> Self {
        let mut orbit = Self {
            yaw: 0.0,
            pitch: 0.0,
            zoom: 1.0,
            auto_rotate: true,
            dragging: false,
            limits,
        };
        orbit.set_yaw(yaw);
        orbit.set_pitch(pitch);
        orbit.set_zoom(zoom);
        orbit
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        if yaw.is_finite() {
            self.yaw = yaw.rem_euclid(TAU);
        }
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        if pitch.is_finite() {
            self.pitch = pitch.clamp(self.limits.pitch_min, self.limits.pitch_max);
        }
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(self.limits.zoom_min, self.limits.zoom_max);
        }
    }

    /// Apply a pointer drag in pixels
    pub fn drag_by(&mut self, dx: f32, dy: f32) {
        self.set_yaw(self.yaw + dx * self.limits.drag_yaw);
        self.set_pitch(self.pitch + dy * self.limits.drag_pitch);
    }

    /// Apply signed wheel notches; positive (scrolling down) zooms in
    pub fn wheel(&mut self, steps: i32) {
        let factor = if steps > 0 {
            1.0 + self.limits.wheel_step
        } else {
            1.0 - self.limits.wheel_step
        };
        for _ in 0..steps.unsigned_abs() {
            self.set_zoom(self.zoom * factor);
        }
    }

    /// Apply a pinch distance ratio (> 1 spreads fingers, zooms in)
    pub fn pinch(&mut self, ratio: f32) {
        if ratio.is_finite() && ratio > 0.0 {
            self.set_zoom(self.zoom * ratio);
        }
    }

    /// Advance auto-rotation unless disabled or a drag is in progress
    pub fn auto_rotate_step(&mut self, dt: f32) {
        if self.auto_rotate && !self.dragging && self.limits.rotation_period > 0.0 {
            self.set_yaw(self.yaw + TAU / self.limits.rotation_period * dt);
        }
    }
}

/// Perspective constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lens {
    /// Focal scale in pixels
    pub fov: f32,
    /// Camera distance at unit zoom
    pub distance: f32,
    /// Depth floor applied before dividing
    pub min_depth: f32,
}

impl Default for Lens {
    fn default() -> Self {
        Self {
            fov: 520.0,
            distance: 720.0,
            min_depth: 90.0,
        }
    }
}

/// Ephemeral projection result
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    pub x: f32,
    pub y: f32,
    /// Perspective scale, always positive and finite for finite input
    pub scale: f32,
    pub depth: f32,
}

/// Orbit state plus the ambient in-plane spin
#[derive(Debug, Clone)]
pub struct Camera {
    pub orbit: OrbitState,
    pub lens: Lens,
    /// In-plane rotation applied after the orbit
    pub spin: f32,
}

impl Camera {
    pub fn new(orbit: OrbitState, lens: Lens) -> Self {
        Self {
            orbit,
            lens,
            spin: 0.0,
        }
    }

    /// Ambient spin rate grows with swirl
    pub fn advance_spin(&mut self, dt: f32, swirl: f32, spin_min: f32, spin_max: f32) {
        self.spin = (self.spin + dt * lerp(spin_min, spin_max, swirl)).rem_euclid(TAU);
    }

    /// Freeze the current view into a projector for one frame
    pub fn projector(&self) -> Projector {
        let (sy, cy) = self.orbit.yaw.sin_cos();
        let (sp, cp) = self.orbit.pitch.sin_cos();
        let (ss, cs) = self.spin.sin_cos();
        Projector {
            yaw: (sy, cy),
            pitch: (sp, cp),
            spin: (ss, cs),
            zoom: self.orbit.zoom,
            lens: self.lens,
        }
    }

    pub fn project(&self, p: Vec3, origin: (f32, f32)) -> ProjectedPoint {
        self.projector().project(p, origin)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(OrbitState::default(), Lens::default())
    }
}

/// Precomputed camera trig; the one projection used by every element
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    yaw: (f32, f32),
    pitch: (f32, f32),
    spin: (f32, f32),
    zoom: f32,
    lens: Lens,
}

impl Projector {
    /// Yaw about the vertical axis, pitch about the horizontal axis, then
    /// in-plane spin; depth is floored at `min_depth` before dividing.
    pub fn project(&self, p: Vec3, origin: (f32, f32)) -> ProjectedPoint {
        let (sy, cy) = self.yaw;
        let x = p.x * cy + p.z * sy;
        let z = -p.x * sy + p.z * cy;

        let (sp, cp) = self.pitch;
        let y = p.y * cp - z * sp;
        let z = p.y * sp + z * cp;

        let (ss, cs) = self.spin;
        let xx = x * cs - y * ss;
        let yy = x * ss + y * cs;

        let depth = self.lens.distance / self.zoom + z;
        let scale = (self.lens.fov * self.zoom) / depth.max(self.lens.min_depth);
        ProjectedPoint {
            x: origin.0 + xx * scale,
            y: origin.1 + yy * scale,
            scale,
            depth,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level_camera() -> Camera {
        Camera::new(OrbitState::new(0.0, 0.0, 1.0, OrbitLimits::default()), Lens::default())
    }

    #[test]
    fn origin_projects_to_screen_origin() {
        let cam = level_camera();
        let p = cam.project(Vec3::ZERO, (640.0, 360.0));
        assert!((p.x - 640.0).abs() < 1e-4);
        assert!((p.y - 360.0).abs() < 1e-4);
        assert!((p.depth - 720.0).abs() < 1e-4);
        assert!((p.scale - 520.0 / 720.0).abs() < 1e-6);
    }

    #[test]
    fn projection_is_deterministic() {
        let mut cam = level_camera();
        cam.orbit.set_yaw(1.1);
        cam.orbit.set_pitch(-0.4);
        cam.spin = 0.3;
        let pt = Vec3::new(120.0, -40.0, 300.0);
        assert_eq!(cam.project(pt, (10.0, 20.0)), cam.project(pt, (10.0, 20.0)));
    }

    #[test]
    fn nearer_points_are_larger() {
        let cam = level_camera();
        let far = cam.project(Vec3::new(10.0, 0.0, 400.0), (0.0, 0.0));
        let near = cam.project(Vec3::new(10.0, 0.0, -400.0), (0.0, 0.0));
        assert!(near.scale > far.scale);
    }

    #[test]
    fn behind_camera_scale_stays_bounded() {
        let cam = level_camera();
        let p = cam.project(Vec3::new(5.0, 5.0, -5000.0), (0.0, 0.0));
        assert!(p.depth < 0.0);
        assert!(p.scale.is_finite() && p.scale > 0.0);
        assert!((p.scale - 520.0 / 90.0).abs() < 1e-5);
    }

    #[test]
    fn yaw_half_turn_mirrors_x() {
        let mut cam = level_camera();
        cam.orbit.set_yaw(std::f32::consts::PI);
        let p = cam.project(Vec3::new(100.0, 0.0, 0.0), (0.0, 0.0));
        assert!(p.x < 0.0);
    }

    #[test]
    fn pitch_and_zoom_are_clamped() {
        let mut orbit = OrbitState::default();
        orbit.drag_by(0.0, 10_000.0);
        assert_eq!(orbit.pitch, orbit.limits.pitch_max);
        orbit.drag_by(0.0, -10_000.0);
        assert_eq!(orbit.pitch, orbit.limits.pitch_min);

        orbit.wheel(100);
        assert_eq!(orbit.zoom, orbit.limits.zoom_max);
        orbit.pinch(0.01);
        assert_eq!(orbit.zoom, orbit.limits.zoom_min);
    }

    #[test]
    fn auto_rotation_wraps_and_respects_drag() {
        let mut orbit = OrbitState::default();
        for _ in 0..(19 * 60) {
            orbit.auto_rotate_step(1.0 / 60.0);
        }
        assert!((0.0..TAU).contains(&orbit.yaw));

        let before = orbit.yaw;
        orbit.dragging = true;
        orbit.auto_rotate_step(1.0);
        assert_eq!(orbit.yaw, before);
    }

    #[test]
    fn wheel_direction() {
        let mut orbit = OrbitState::default();
        orbit.wheel(1);
        assert!((orbit.zoom - 1.06).abs() < 1e-6);
        orbit.wheel(-1);
        assert!((orbit.zoom - 1.06 * 0.94).abs() < 1e-6);
    }
}
