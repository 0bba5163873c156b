//! Host collaborators the core calls out to
//!
//! Every call is best-effort: results are requested, never joined into the
//! simulation, and failures are logged then discarded.

use crate::curves::Cue;
use blossom_core::Result;
use std::fmt::Display;

/// Background music and cue playback
pub trait AudioHandle {
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self) -> Result<()>;
    /// Linear amplitude, 0..1
    fn set_volume(&mut self, volume: f64) -> Result<()>;
    fn set_muted(&mut self, muted: bool) -> Result<()>;
    fn play_cue(&mut self, cue: Cue) -> Result<()>;
}

pub trait Fullscreen {
    fn request_fullscreen(&mut self) -> Result<()>;
}

/// One-way hand-off to the next screen
pub trait Navigator {
    fn navigate(&mut self, target: &str) -> Result<()>;
}

/// Log and discard a collaborator failure
pub fn best_effort<T, E: Display>(label: &str, result: std::result::Result<T, E>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            log::warn!("[host] {label} failed, continuing without it: {e}");
            None
        }
    }
}

/// Audio handle that does nothing
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioHandle for NullAudio {
    fn play(&mut self) -> Result<()> {
        Ok(())
    }
    fn pause(&mut self) -> Result<()> {
        Ok(())
    }
    fn set_volume(&mut self, _volume: f64) -> Result<()> {
        Ok(())
    }
    fn set_muted(&mut self, _muted: bool) -> Result<()> {
        Ok(())
    }
    fn play_cue(&mut self, _cue: Cue) -> Result<()> {
        Ok(())
    }
}

/// Fullscreen is unavailable (headless)
#[derive(Debug, Default)]
pub struct NoFullscreen;

impl Fullscreen for NoFullscreen {
    fn request_fullscreen(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Navigator that records and logs the requested targets
#[derive(Debug, Default)]
pub struct LogNavigator {
    pub visited: Vec<String>,
}

impl Navigator for LogNavigator {
    fn navigate(&mut self, target: &str) -> Result<()> {
        log::info!("[host] navigate -> {target}");
        self.visited.push(target.to_string());
        Ok(())
    }
}

/// The collaborators handed to the driver for one frame
pub struct Collaborators<'a> {
    pub audio: &'a mut dyn AudioHandle,
    pub fullscreen: &'a mut dyn Fullscreen,
    pub navigator: &'a mut dyn Navigator,
}

impl<'a> Collaborators<'a> {
    pub fn new(
        audio: &'a mut dyn AudioHandle,
        fullscreen: &'a mut dyn Fullscreen,
        navigator: &'a mut dyn Navigator,
    ) -> Self {
        Self {
            audio,
            fullscreen,
            navigator,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blossom_core::BlossomError;

    #[test]
    fn best_effort_swallows_errors() {
        let err: std::result::Result<(), BlossomError> =
            Err(BlossomError::AudioError("autoplay blocked".into()));
        assert!(best_effort("play music", err).is_none());
        assert_eq!(best_effort("ok", Ok::<_, BlossomError>(3)), Some(3));
    }

    #[test]
    fn log_navigator_records_targets() {
        let mut nav = LogNavigator::default();
        nav.navigate("next").unwrap();
        assert_eq!(nav.visited, vec!["next".to_string()]);
    }
}
