//! Headless frame-to-PNG render command

use super::load_config;
use anyhow::{Context, Result};
use blossom_core::Color;
use blossom_render::{Layer, Paint, Path as ShapePath, Raster, Surface};
use blossom_runtime::host::{LogNavigator, NoFullscreen, NullAudio};
use blossom_runtime::Collaborators;
use blossom_scene::{FrameDriver, FrameReport, SceneConfig, Viewport};
use std::path::{Path, PathBuf};

pub struct RenderArgs {
    pub config: Option<PathBuf>,
    pub out: PathBuf,
    pub width: u32,
    pub height: u32,
    pub dpr: f32,
    pub at: f64,
    pub frames: Option<usize>,
    pub fps: f64,
    pub yaw: Option<f32>,
    pub pitch: Option<f32>,
    pub zoom: Option<f32>,
    pub still: bool,
}

/// Surface for simulated frames nobody looks at
struct Discard {
    width: f32,
    height: f32,
}

impl Surface for Discard {
    fn width(&self) -> f32 {
        self.width
    }
    fn height(&self) -> f32 {
        self.height
    }
    fn clear(&mut self, _color: Color) {}
    fn fill_rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32, _paint: &Paint) {}
    fn fill_circle(&mut self, _cx: f32, _cy: f32, _r: f32, _paint: &Paint) {}
    fn fill_ellipse(&mut self, _cx: f32, _cy: f32, _rx: f32, _ry: f32, _rot: f32, _color: Color) {}
    fn stroke_line(&mut self, _x0: f32, _y0: f32, _x1: f32, _y1: f32, _w: f32, _color: Color) {}
    fn fill_path(&mut self, _path: &ShapePath, _paint: &Paint) {}
    fn stroke_path(&mut self, _path: &ShapePath, _width: f32, _color: Color) {}
    fn draw_layer(&mut self, _layer: &Layer) {}
}

/// Fixed-step headless session with no-op collaborators
pub struct HeadlessSession {
    driver: FrameDriver,
    raster: Raster,
    discard: Discard,
    dt: f64,
    audio: NullAudio,
    fullscreen: NoFullscreen,
    navigator: LogNavigator,
}

impl HeadlessSession {
    pub fn new(mut config: SceneConfig, viewport: Viewport, fps: f64) -> Result<Self> {
        config.experience.wait_for_unlock = false;
        config.experience.navigate_on_finish = false;
        // Headless frames advance by exactly 1/fps
        let dt = 1.0 / fps.max(1.0);
        config.frame.max_dt = config.frame.max_dt.max(dt);

        let driver = FrameDriver::new(config, viewport);
        let vp = driver.viewport();
        let raster = Raster::new(vp.width, vp.height, vp.dpr).context("Failed to allocate frame raster")?;
        Ok(Self {
            raster,
            discard: Discard {
                width: vp.width as f32,
                height: vp.height as f32,
            },
            driver,
            dt,
            audio: NullAudio,
            fullscreen: NoFullscreen,
            navigator: LogNavigator::default(),
        })
    }

    pub fn driver(&self) -> &FrameDriver {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut FrameDriver {
        &mut self.driver
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    /// Advance one frame; paint into the raster only when `keep` is set
    pub fn step(&mut self, keep: bool) -> FrameReport {
        let mut host = Collaborators::new(&mut self.audio, &mut self.fullscreen, &mut self.navigator);
        if keep {
            self.driver.frame(self.dt, &mut self.raster, &mut host)
        } else {
            self.driver.frame(self.dt, &mut self.discard, &mut host)
        }
    }

    /// Run until simulation time reaches `t`, painting only the last frame
    pub fn advance_to(&mut self, t: f64) -> FrameReport {
        let total = self.driver.context().timeline.total_duration();
        let target = t.clamp(0.0, total);
        let frames = ((target / self.dt).round() as usize).max(1);
        for _ in 1..frames {
            self.step(false);
        }
        self.step(true)
    }
}

fn apply_camera(config: &mut SceneConfig, args: &RenderArgs) {
    if let Some(yaw) = args.yaw {
        config.camera.yaw = yaw.to_radians();
    }
    if let Some(pitch) = args.pitch {
        config.camera.pitch = pitch.to_radians();
    }
    if let Some(zoom) = args.zoom {
        config.camera.zoom = zoom;
    }
    if args.still {
        config.camera.auto_rotate = false;
    }
}

fn describe(report: &FrameReport) -> String {
    format!(
        "t={:.2}s phase {} ({:.2}) bloom {:?}, {} sparks",
        report.time, report.phase, report.local_t, report.bloom, report.sparks_active
    )
}

pub fn run(args: RenderArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    apply_camera(&mut config, &args);
    config.validate().context("Invalid configuration")?;

    let viewport = Viewport::new(args.width, args.height, args.dpr);
    let mut session = HeadlessSession::new(config, viewport, args.fps)?;
    let (dw, dh) = session.raster().device_size();

    match args.frames {
        Some(count) => {
            let dir = &args.out;
            std::fs::create_dir_all(dir).with_context(|| format!("Failed to create '{}'", dir.display()))?;
            for i in 0..count {
                let report = session.step(true);
                let path = frame_path(dir, i);
                session
                    .raster()
                    .save_png(&path)
                    .with_context(|| format!("Failed to write '{}'", path.display()))?;
                log::debug!("[render] {} -> {}", describe(&report), path.display());
            }
            println!("Wrote {count} frames ({dw}x{dh}) to {}", dir.display());
        }
        None => {
            let report = session.advance_to(args.at);
            session
                .raster()
                .save_png(&args.out)
                .with_context(|| format!("Failed to write '{}'", args.out.display()))?;
            println!("Rendered {} ({dw}x{dh}): {}", args.out.display(), describe(&report));
        }
    }
    Ok(())
}

fn frame_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("frame_{index:05}.png"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use blossom_scene::BloomState;

    fn session(fps: f64) -> HeadlessSession {
        HeadlessSession::new(SceneConfig::default(), Viewport::new(96, 54, 1.0), fps).unwrap()
    }

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("blossom_render_test_{}_{name}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn headless_session_starts_without_unlock() {
        let mut s = session(30.0);
        let report = s.step(true);
        assert!(report.time > 0.0);
        assert!(s.driver().is_unlocked());
    }

    #[test]
    fn advance_to_reaches_the_bloom() {
        let mut s = session(30.0);
        let report = s.advance_to(20.0);
        assert!((report.time - 20.0).abs() < 1e-6);
        assert_eq!(report.phase, 4);
        assert_eq!(report.bloom, BloomState::Opening);
    }

    #[test]
    fn renders_are_deterministic() {
        let mut a = session(30.0);
        let mut b = session(30.0);
        a.advance_to(12.0);
        b.advance_to(12.0);
        assert!(a.raster().to_image() == b.raster().to_image());
    }

    #[test]
    fn higher_fps_keeps_steps_exact() {
        let mut s = session(60.0);
        let report = s.step(false);
        assert!((report.step - 1.0 / 60.0).abs() < 1e-12);
        let mut slow = session(10.0);
        let report = slow.step(false);
        assert!((report.step - 0.1).abs() < 1e-12);
    }

    #[test]
    fn camera_flags_override_config() {
        let mut config = SceneConfig::default();
        let args = RenderArgs {
            config: None,
            out: PathBuf::from("x.png"),
            width: 10,
            height: 10,
            dpr: 1.0,
            at: 0.0,
            frames: None,
            fps: 30.0,
            yaw: Some(90.0),
            pitch: Some(-10.0),
            zoom: Some(1.2),
            still: true,
        };
        apply_camera(&mut config, &args);
        assert!((config.camera.yaw - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert!((config.camera.pitch + 10f32.to_radians()).abs() < 1e-6);
        assert_eq!(config.camera.zoom, 1.2);
        assert!(!config.camera.auto_rotate);
    }

    #[test]
    fn frame_sequence_writes_numbered_pngs() {
        let dir = temp_dir("frames");
        run(RenderArgs {
            config: None,
            out: dir.clone(),
            width: 48,
            height: 27,
            dpr: 1.0,
            at: 0.0,
            frames: Some(3),
            fps: 30.0,
            yaw: None,
            pitch: None,
            zoom: None,
            still: false,
        })
        .unwrap();
        for i in 0..3 {
            assert!(frame_path(&dir, i).exists());
        }
        std::fs::remove_dir_all(&dir).ok();
    }
}
