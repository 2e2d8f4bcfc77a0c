//! Audio playback.
//!
//! [`PlaybackController`] is a small transport state machine over the
//! [`AudioEngine`] capability. One engine instance is exclusively owned by
//! one controller and released when the controller closes; nothing here is
//! shared between sessions. The default engine, [`RodioEngine`], drives a
//! `rodio::OutputStream` + `Sink`; tests inject a scripted engine instead so
//! the state machine can be exercised without a sound device.

pub mod controller;
pub mod engine;

pub use controller::{PlaybackController, TransportState, SEEK_STEP_SECS};
pub use engine::{AudioEngine, PlayerError, RodioEngine};
