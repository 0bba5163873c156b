//! Blossom Audio - Music and cue playback (Kira backend)
//!
//! `MusicPlayer` implements the runtime's `AudioHandle`: a looped
//! background track started on unlock, a volume and mute switch, and
//! one-shot sounds for timeline cues. Without an audio device, or with
//! missing files, it runs silent.

use blossom_core::{BlossomError, Result};
use blossom_runtime::{AudioHandle, Cue};
use blossom_scene::AudioConfig;
use kira::sound::static_sound::{StaticSoundData, StaticSoundHandle};
use kira::sound::PlaybackState;
use kira::{AudioManager, AudioManagerSettings, Decibels, DefaultBackend, Tween};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Floor used for silence
pub const SILENCE_DB: f32 = -60.0;

const FADE: Duration = Duration::from_millis(120);

pub struct MusicPlayer {
    manager: Option<AudioManager<DefaultBackend>>,
    music: Option<StaticSoundData>,
    handle: Option<StaticSoundHandle>,
    cues: HashMap<Cue, StaticSoundData>,
    volume: f64,
    muted: bool,
}

impl MusicPlayer {
    /// Open the default output device and load the configured sounds.
    /// Relative paths resolve against `base_dir`.
    pub fn new(config: &AudioConfig, base_dir: &Path) -> Self {
        let manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())
            .map_err(|e| log::warn!("[audio] no device available ({e}), running silent"))
            .ok();
        Self::with_manager(manager, config, base_dir)
    }

    /// Player that never opens a device; sounds still load
    pub fn silent(config: &AudioConfig, base_dir: &Path) -> Self {
        Self::with_manager(None, config, base_dir)
    }

    fn with_manager(manager: Option<AudioManager<DefaultBackend>>, config: &AudioConfig, base_dir: &Path) -> Self {
        let music = config
            .music
            .as_deref()
            .and_then(|p| load_or_warn("music", &resolve(base_dir, p)));

        let cues = [
            (Cue::Whoosh, &config.cues.whoosh),
            (Cue::Sparkle, &config.cues.sparkle),
            (Cue::BloomBegins, &config.cues.bloom),
        ]
        .into_iter()
        .filter_map(|(cue, path)| {
            let path = resolve(base_dir, path.as_deref()?);
            load_or_warn(&format!("{cue:?} cue"), &path).map(|data| (cue, data))
        })
        .collect();

        Self {
            manager,
            music,
            handle: None,
            cues,
            volume: config.volume.clamp(0.0, 1.0),
            muted: config.muted,
        }
    }

    /// Whether a device is open
    pub fn is_available(&self) -> bool {
        self.manager.is_some()
    }

    pub fn has_music(&self) -> bool {
        self.music.is_some()
    }

    pub fn has_cue(&self, cue: Cue) -> bool {
        self.cues.contains_key(&cue)
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Output level after mute
    pub fn effective_db(&self) -> Decibels {
        if self.muted {
            Decibels(SILENCE_DB)
        } else {
            amplitude_to_db(self.volume)
        }
    }

    pub fn is_playing(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|h| h.state() == PlaybackState::Playing)
    }

    fn apply_volume(&mut self) {
        let db = self.effective_db();
        if let Some(handle) = &mut self.handle {
            handle.set_volume(db, fade());
        }
    }
}

impl AudioHandle for MusicPlayer {
    fn play(&mut self) -> Result<()> {
        if let Some(handle) = &mut self.handle {
            handle.resume(fade());
            return Ok(());
        }
        let db = self.effective_db();
        let (Some(manager), Some(music)) = (&mut self.manager, &self.music) else {
            return Ok(());
        };
        let handle = manager
            .play(music.clone().volume(db).loop_region(..))
            .map_err(|e| BlossomError::AudioError(format!("Failed to start music: {e}")))?;
        log::info!("[audio] music started");
        self.handle = Some(handle);
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        if let Some(handle) = &mut self.handle {
            handle.pause(fade());
        }
        Ok(())
    }

    fn set_volume(&mut self, volume: f64) -> Result<()> {
        if !volume.is_finite() {
            return Err(BlossomError::ValueOutOfRange {
                field: "volume".into(),
                min: 0.0,
                max: 1.0,
                value: volume,
            });
        }
        self.volume = volume.clamp(0.0, 1.0);
        self.apply_volume();
        Ok(())
    }

    fn set_muted(&mut self, muted: bool) -> Result<()> {
        self.muted = muted;
        self.apply_volume();
        Ok(())
    }

    fn play_cue(&mut self, cue: Cue) -> Result<()> {
        if self.muted {
            return Ok(());
        }
        let db = self.effective_db();
        let (Some(manager), Some(data)) = (&mut self.manager, self.cues.get(&cue)) else {
            return Ok(());
        };
        manager
            .play(data.clone().volume(db))
            .map_err(|e| BlossomError::AudioError(format!("Failed to play {cue:?} cue: {e}")))?;
        Ok(())
    }
}

fn fade() -> Tween {
    Tween {
        duration: FADE,
        ..Default::default()
    }
}

fn resolve(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

fn load_or_warn(label: &str, path: &Path) -> Option<StaticSoundData> {
    match StaticSoundData::from_file(path) {
        Ok(data) => {
            log::debug!("[audio] loaded {label} from {}", path.display());
            Some(data)
        }
        Err(e) => {
            log::warn!("[audio] could not load {label} '{}': {e}", path.display());
            None
        }
    }
}

/// Linear amplitude (0..1) to decibels, floored at silence
pub fn amplitude_to_db(amplitude: f64) -> Decibels {
    if amplitude <= 0.0 {
        Decibels(SILENCE_DB)
    } else {
        Decibels((20.0 * (amplitude as f32).log10()).max(SILENCE_DB))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blossom_scene::CueSounds;

    fn missing_files() -> AudioConfig {
        AudioConfig {
            music: Some("no-such-track.ogg".into()),
            cues: CueSounds {
                whoosh: Some("no-such-whoosh.ogg".into()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn decibel_mapping() {
        assert_eq!(amplitude_to_db(0.0), Decibels(SILENCE_DB));
        assert_eq!(amplitude_to_db(-1.0), Decibels(SILENCE_DB));
        assert!(amplitude_to_db(1.0).0.abs() < 1e-6);
        assert!((amplitude_to_db(0.5).0 + 6.0206).abs() < 1e-3);
        assert_eq!(amplitude_to_db(1e-9), Decibels(SILENCE_DB));
    }

    #[test]
    fn missing_files_run_silent() {
        let mut player = MusicPlayer::silent(&missing_files(), Path::new("/nonexistent"));
        assert!(!player.is_available());
        assert!(!player.has_music());
        assert!(!player.has_cue(Cue::Whoosh));
        assert!(player.play().is_ok());
        assert!(player.play_cue(Cue::Whoosh).is_ok());
        assert!(player.pause().is_ok());
        assert!(!player.is_playing());
    }

    #[test]
    fn mute_silences_output() {
        let mut player = MusicPlayer::silent(&AudioConfig::default(), Path::new("."));
        assert!((player.volume() - 0.55).abs() < 1e-12);
        player.set_muted(true).unwrap();
        assert!(player.is_muted());
        assert_eq!(player.effective_db(), Decibels(SILENCE_DB));
        player.set_muted(false).unwrap();
        assert_eq!(player.effective_db(), amplitude_to_db(0.55));
    }

    #[test]
    fn volume_is_clamped() {
        let mut player = MusicPlayer::silent(&AudioConfig::default(), Path::new("."));
        player.set_volume(3.0).unwrap();
        assert_eq!(player.volume(), 1.0);
        player.set_volume(-1.0).unwrap();
        assert_eq!(player.volume(), 0.0);
        assert!(player.set_volume(f64::NAN).is_err());
    }

    #[test]
    fn relative_paths_resolve_against_base() {
        assert_eq!(resolve(Path::new("/data"), Path::new("a.ogg")), PathBuf::from("/data/a.ogg"));
        assert_eq!(resolve(Path::new("/data"), Path::new("/abs/a.ogg")), PathBuf::from("/abs/a.ogg"));
    }
}
