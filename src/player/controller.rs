use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;
use serde::Serialize;

use super::engine::{AudioEngine, PlayerError};

/// Seek granularity exposed to the transport surface, in seconds.
pub const SEEK_STEP_SECS: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportState {
    Idle,
    LoadedPaused,
    Playing,
}

/// Transport state machine over one [`AudioEngine`].
///
/// Volume (0–100) and rate (control value 50–200, mapped to 0.5×–2.0×) are
/// continuous controls: they clamp, apply immediately in any state, and are
/// re-applied to the engine whenever a resource is bound. Transport
/// operations that need a resource fail softly with
/// [`PlayerError::NoResource`].
pub struct PlaybackController<E: AudioEngine> {
    engine: E,
    resource: Option<PathBuf>,
    state: TransportState,
    volume: u8,
    rate_control: u16,
}

impl<E: AudioEngine> PlaybackController<E> {
    /// An empty controller: `Idle`, nothing bound.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            resource: None,
            state: TransportState::Idle,
            volume: 100,
            rate_control: 100,
        }
    }

    /// Construct with a resource already bound. The resource is loaded but
    /// playback does not start.
    pub fn with_resource(engine: E, path: &Path) -> Result<Self, PlayerError> {
        let mut controller = Self::new(engine);
        controller.load(path)?;
        Ok(controller)
    }

    /// Remember a path without binding it. The controller stays `Idle`; the
    /// next [`toggle`](Self::toggle) loads the path and starts playback.
    pub fn set_resource(&mut self, path: &Path) {
        self.resource = Some(path.to_path_buf());
    }

    /// Bind `path` as the loaded resource. Never auto-plays.
    pub fn load(&mut self, path: &Path) -> Result<(), PlayerError> {
        self.engine.load(path)?;
        self.engine.set_volume(self.volume as f32 / 100.0);
        self.engine.set_speed(self.rate_control as f32 / 100.0);
        self.resource = Some(path.to_path_buf());
        self.state = TransportState::LoadedPaused;
        debug!("loaded {}", path.display());
        Ok(())
    }

    /// Play/pause flip. From `Idle` this is an error unless a path is known,
    /// in which case the path is loaded and playback starts.
    pub fn toggle(&mut self) -> Result<TransportState, PlayerError> {
        match self.state {
            TransportState::Idle => match self.resource.clone() {
                Some(path) => {
                    self.load(&path)?;
                    self.engine.play();
                    self.state = TransportState::Playing;
                }
                None => return Err(PlayerError::NoResource),
            },
            TransportState::LoadedPaused => {
                self.engine.play();
                self.state = TransportState::Playing;
            }
            TransportState::Playing => {
                self.engine.pause();
                self.state = TransportState::LoadedPaused;
            }
        }
        Ok(self.state)
    }

    /// Stop playback and reset the transport position to zero.
    pub fn restart(&mut self) -> Result<TransportState, PlayerError> {
        match self.state {
            TransportState::Idle => Err(PlayerError::NoResource),
            TransportState::Playing | TransportState::LoadedPaused => {
                self.engine.pause();
                self.engine.seek_to(Duration::ZERO)?;
                self.state = TransportState::LoadedPaused;
                Ok(self.state)
            }
        }
    }

    /// Seek by `delta_secs` relative to the current position, clamped to
    /// `[0, duration]`. Returns the position actually requested.
    pub fn seek(&mut self, delta_secs: i64) -> Result<Duration, PlayerError> {
        if self.state == TransportState::Idle {
            return Err(PlayerError::NoResource);
        }
        let position = self.engine.position();
        let step = Duration::from_secs(delta_secs.unsigned_abs());
        let mut target = if delta_secs >= 0 {
            position.saturating_add(step)
        } else {
            position.saturating_sub(step)
        };
        if let Some(duration) = self.engine.duration() {
            target = target.min(duration);
        }
        self.engine.seek_to(target)?;
        Ok(target)
    }

    /// Clamp to 0–100 and apply immediately. Safe in any state.
    pub fn set_volume(&mut self, volume: u8) {
        self.volume = volume.min(100);
        self.engine.set_volume(self.volume as f32 / 100.0);
    }

    /// Accepts a control value in 50–200 (clamped) and maps it to a playback
    /// rate of 0.5×–2.0×. Safe in any state.
    pub fn set_rate(&mut self, control: u16) {
        self.rate_control = control.clamp(50, 200);
        self.engine.set_speed(self.rate_control as f32 / 100.0);
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn rate(&self) -> f32 {
        self.rate_control as f32 / 100.0
    }

    /// Label for a play/pause button in whatever surface drives this
    /// controller.
    pub fn toggle_label(&self) -> &'static str {
        match self.state {
            TransportState::Playing => "Pause",
            _ => "Play",
        }
    }

    /// Stop playback if needed and release the engine's resource. Terminal:
    /// the controller is consumed.
    pub fn close(self) {
        if self.state == TransportState::Playing {
            self.engine.pause();
        }
        self.engine.release();
    }
}
