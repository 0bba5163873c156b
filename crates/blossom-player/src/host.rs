//! Window-backed collaborators

use blossom_core::{BlossomError, Result};
use blossom_runtime::{Fullscreen, Navigator};
use std::sync::Arc;
use winit::window::{Fullscreen as WindowMode, Window};

/// Switches the window to borderless fullscreen
#[derive(Default)]
pub struct WindowFullscreen {
    window: Option<Arc<Window>>,
}

impl WindowFullscreen {
    pub fn attach(&mut self, window: Arc<Window>) {
        self.window = Some(window);
    }

    /// Leave fullscreen if active, enter it otherwise
    pub fn toggle(&self) {
        if let Some(window) = &self.window {
            if window.fullscreen().is_some() {
                window.set_fullscreen(None);
            } else {
                window.set_fullscreen(Some(WindowMode::Borderless(None)));
            }
        }
    }
}

impl Fullscreen for WindowFullscreen {
    fn request_fullscreen(&mut self) -> Result<()> {
        let window = self
            .window
            .as_ref()
            .ok_or_else(|| BlossomError::RenderError("No window to make fullscreen".into()))?;
        if window.fullscreen().is_none() {
            window.set_fullscreen(Some(WindowMode::Borderless(None)));
        }
        Ok(())
    }
}

/// Remembers the requested screen; the player leaves once one is set
#[derive(Debug, Default)]
pub struct ExitNavigator {
    target: Option<String>,
}

impl ExitNavigator {
    pub fn take(&mut self) -> Option<String> {
        self.target.take()
    }
}

impl Navigator for ExitNavigator {
    fn navigate(&mut self, target: &str) -> Result<()> {
        log::info!("[player] navigating to '{target}'");
        self.target = Some(target.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fullscreen_without_window_is_an_error() {
        let mut fullscreen = WindowFullscreen::default();
        assert!(fullscreen.request_fullscreen().is_err());
    }

    #[test]
    fn navigator_keeps_latest_target() {
        let mut nav = ExitNavigator::default();
        nav.navigate("next").unwrap();
        nav.navigate("back").unwrap();
        assert_eq!(nav.take().as_deref(), Some("back"));
        assert_eq!(nav.take(), None);
    }
}
