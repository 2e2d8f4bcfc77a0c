use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use parking_lot::Mutex;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Serialize)]
pub enum PlayerError {
    #[error("no audio resource is loaded")]
    NoResource,
    #[error("could not open the audio file: {0}")]
    Io(String),
    #[error("the audio file could not be decoded: {0}")]
    Decode(String),
    #[error("no playback device available")]
    Device,
    #[error("seek failed: {0}")]
    Seek(String),
}

/// The media-player capability the controller drives.
///
/// Engines hold at most one resource. Transport calls on an engine with no
/// resource are no-ops; the controller's state machine is responsible for
/// not reaching them.
pub trait AudioEngine {
    /// Bind `path` as the current resource, replacing any previous one.
    /// Playback must not start.
    fn load(&self, path: &Path) -> Result<(), PlayerError>;
    fn play(&self);
    fn pause(&self);
    fn seek_to(&self, position: Duration) -> Result<(), PlayerError>;
    fn position(&self) -> Duration;
    fn duration(&self) -> Option<Duration>;
    fn set_volume(&self, gain: f32);
    fn set_speed(&self, factor: f32);
    /// Stop playback and drop the resource and the device handle.
    fn release(&self);
}

struct LoadedResource {
    // Keeps the device stream alive for as long as the sink plays.
    _stream: OutputStream,
    _handle: OutputStreamHandle,
    sink: Sink,
    duration: Option<Duration>,
}

/// Engine backed by rodio. The file is opened and decoded before any device
/// is acquired, so resource errors surface even on machines with no audio
/// output.
#[derive(Default)]
pub struct RodioEngine {
    inner: Mutex<Option<LoadedResource>>,
}

impl RodioEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioEngine for RodioEngine {
    fn load(&self, path: &Path) -> Result<(), PlayerError> {
        let file = File::open(path).map_err(|err| PlayerError::Io(err.to_string()))?;
        let decoder =
            Decoder::new(BufReader::new(file)).map_err(|err| PlayerError::Decode(err.to_string()))?;
        let duration = decoder.total_duration();

        let (stream, handle) = OutputStream::try_default().map_err(|_| PlayerError::Device)?;
        let sink = Sink::try_new(&handle).map_err(|err| PlayerError::Io(err.to_string()))?;
        sink.append(decoder);
        sink.pause();

        *self.inner.lock() = Some(LoadedResource {
            _stream: stream,
            _handle: handle,
            sink,
            duration,
        });
        Ok(())
    }

    fn play(&self) {
        if let Some(loaded) = self.inner.lock().as_ref() {
            loaded.sink.play();
        }
    }

    fn pause(&self) {
        if let Some(loaded) = self.inner.lock().as_ref() {
            loaded.sink.pause();
        }
    }

    fn seek_to(&self, position: Duration) -> Result<(), PlayerError> {
        match self.inner.lock().as_ref() {
            Some(loaded) => loaded
                .sink
                .try_seek(position)
                .map_err(|err| PlayerError::Seek(err.to_string())),
            None => Err(PlayerError::NoResource),
        }
    }

    fn position(&self) -> Duration {
        self.inner
            .lock()
            .as_ref()
            .map(|loaded| loaded.sink.get_pos())
            .unwrap_or_default()
    }

    fn duration(&self) -> Option<Duration> {
        self.inner.lock().as_ref().and_then(|loaded| loaded.duration)
    }

    fn set_volume(&self, gain: f32) {
        if let Some(loaded) = self.inner.lock().as_ref() {
            loaded.sink.set_volume(gain);
        }
    }

    fn set_speed(&self, factor: f32) {
        if let Some(loaded) = self.inner.lock().as_ref() {
            loaded.sink.set_speed(factor);
        }
    }

    fn release(&self) {
        if let Some(loaded) = self.inner.lock().take() {
            loaded.sink.stop();
        }
    }
}
