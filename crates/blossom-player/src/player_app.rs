//! Player application implementing winit ApplicationHandler
//!
//! Feeds window input into the frame driver, paints into a software
//! raster each redraw and presents it through wgpu.

use crate::blit::BlitContext;
use crate::host::{ExitNavigator, WindowFullscreen};
use blossom_audio::MusicPlayer;
use blossom_render::{Raster, Surface};
use blossom_runtime::{Collaborators, InputState};
use blossom_scene::{FrameDriver, SceneConfig, Viewport};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, TouchPhase, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

/// Winit reports scrolling up as positive; the input state expects scrolling down
fn scroll_down_amount(delta: MouseScrollDelta) -> f64 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => -(y as f64),
        MouseScrollDelta::PixelDelta(p) => -p.y,
    }
}

pub struct PlayerApp {
    driver: FrameDriver,
    input: InputState,
    audio: MusicPlayer,
    fullscreen: WindowFullscreen,
    navigator: ExitNavigator,
    raster: Raster,

    window: Option<Arc<Window>>,
    blit: Option<BlitContext>,
    last_frame: Option<Instant>,
    scale_factor: f64,

    /// Start in borderless fullscreen
    pub start_fullscreen: bool,
    /// Screen the player left for, once navigation happened
    pub exit_target: Option<String>,
}

impl PlayerApp {
    /// `asset_dir` resolves relative sound paths in the config
    pub fn new(config: SceneConfig, asset_dir: &Path, start_fullscreen: bool) -> anyhow::Result<Self> {
        let audio = MusicPlayer::new(&config.audio, asset_dir);
        let viewport = Viewport::new(1280, 720, 1.0);
        let driver = FrameDriver::new(config, viewport);
        let vp = driver.viewport();
        let raster = Raster::new(vp.width, vp.height, vp.dpr)?;
        Ok(Self {
            driver,
            input: InputState::new(),
            audio,
            fullscreen: WindowFullscreen::default(),
            navigator: ExitNavigator::default(),
            raster,
            window: None,
            blit: None,
            last_frame: None,
            scale_factor: 1.0,
            start_fullscreen,
            exit_target: None,
        })
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let attrs = Window::default_attributes()
            .with_title("Blossom")
            .with_inner_size(LogicalSize::new(1280.0, 720.0));
        let window = Arc::new(event_loop.create_window(attrs)?);
        if self.start_fullscreen {
            window.set_fullscreen(Some(winit::window::Fullscreen::Borderless(None)));
        }

        self.blit = Some(pollster::block_on(BlitContext::new(window.clone()))?);
        self.fullscreen.attach(window.clone());
        self.scale_factor = window.scale_factor();
        self.apply_size(window.inner_size());
        self.window = Some(window);
        Ok(())
    }

    fn apply_size(&mut self, size: PhysicalSize<u32>) {
        if let Some(blit) = &mut self.blit {
            blit.resize(size);
        }
        let logical: LogicalSize<f64> = size.to_logical(self.scale_factor);
        self.driver.resize(Viewport::new(
            logical.width.round() as u32,
            logical.height.round() as u32,
            self.scale_factor as f32,
        ));
        let vp = self.driver.viewport();
        if self.raster.width() != vp.width as f32 || self.raster.height() != vp.height as f32 || self.raster.dpr() != vp.dpr {
            if let Err(e) = self.raster.resize(vp.width, vp.height, vp.dpr) {
                log::error!("[player] raster resize failed: {e}");
            }
        }
    }

    fn logical(&self, x: f64, y: f64) -> (f64, f64) {
        (x / self.scale_factor, y / self.scale_factor)
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let dt = self
            .last_frame
            .map(|last| now.duration_since(last).as_secs_f64())
            .unwrap_or(0.0);
        self.last_frame = Some(now);

        let mut host = Collaborators::new(&mut self.audio, &mut self.fullscreen, &mut self.navigator);
        self.driver.apply_input(&self.input, &mut host);
        let report = self.driver.frame(dt, &mut self.raster, &mut host);
        self.input.end_frame();

        if report.sparks_dropped > 0 {
            log::trace!("[player] {} spark spawns dropped", report.sparks_dropped);
        }

        if let Some(blit) = &mut self.blit {
            blit.present(&self.raster);
        }

        if let Some(target) = self.navigator.take() {
            self.exit_target = Some(target);
            event_loop.exit();
        }
    }
}

impl ApplicationHandler for PlayerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.initialize(event_loop) {
                log::error!("[player] failed to start: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                self.apply_size(size);
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.scale_factor = scale_factor;
                if let Some(window) = &self.window {
                    let size = window.inner_size();
                    self.apply_size(size);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => {
                            // F11 toggles without going through the driver
                            if key_code == KeyCode::F11 && !event.repeat {
                                self.fullscreen.toggle();
                                return;
                            }
                            self.input.process_key_down(key_code);
                        }
                        ElementState::Released => {
                            self.input.process_key_up(key_code);
                        }
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = self.logical(position.x, position.y);
                self.input.process_pointer_move(x, y);
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => {
                    let (x, y) = self.input.pointer_position().unwrap_or((0.0, 0.0));
                    self.input.process_pointer_down(x, y);
                }
                ElementState::Released => self.input.process_pointer_up(),
            },

            WindowEvent::MouseWheel { delta, .. } => {
                self.input.process_wheel(scroll_down_amount(delta));
            }

            WindowEvent::Touch(touch) => {
                let (x, y) = self.logical(touch.location.x, touch.location.y);
                match touch.phase {
                    TouchPhase::Started => self.input.process_touch_start(touch.id, x, y),
                    TouchPhase::Moved => self.input.process_touch_move(touch.id, x, y),
                    TouchPhase::Ended | TouchPhase::Cancelled => self.input.process_touch_end(touch.id),
                }
            }

            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blossom_render::OrbitState;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn scrolling_down_zooms_in() {
        let mut input = InputState::new();
        input.process_wheel(scroll_down_amount(MouseScrollDelta::LineDelta(0.0, -1.0)));
        assert_eq!(input.wheel_steps(), 1);

        let mut orbit = OrbitState::default();
        let zoom = orbit.zoom;
        orbit.wheel(input.wheel_steps());
        assert!(orbit.zoom > zoom);
    }

    #[test]
    fn scrolling_up_zooms_out() {
        let mut input = InputState::new();
        input.process_wheel(scroll_down_amount(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 40.0))));
        assert_eq!(input.wheel_steps(), -1);
    }
}
