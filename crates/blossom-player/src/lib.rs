//! Blossom Player - windowed runtime for the bloom experience
//!
//! `PlayerApp` owns the frame driver, the Kira music player and a wgpu
//! blit of the software raster. `run` opens a window and returns the
//! screen the user navigated to, if any.

mod blit;
mod host;
mod player_app;

pub use host::{ExitNavigator, WindowFullscreen};
pub use player_app::PlayerApp;

use blossom_scene::SceneConfig;
use std::path::Path;
use winit::event_loop::{ControlFlow, EventLoop};

/// Run the experience until the window closes or navigation happens
pub fn run(config: SceneConfig, asset_dir: &Path, fullscreen: bool) -> anyhow::Result<Option<String>> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = PlayerApp::new(config, asset_dir, fullscreen)?;
    event_loop.run_app(&mut app)?;
    Ok(app.exit_target.take())
}
