//! Speech synthesis.
//!
//! [`SpeechSynthesizer`] is the seam the conversion pipeline talks to; the
//! default [`PiperSynthesizer`] drives a Piper process resolved from the
//! environment, feeding the narration text over stdin.

pub mod piper;

pub use piper::{prepare_text, PiperSynthesizer, SpeechSynthesizer, SynthError};
