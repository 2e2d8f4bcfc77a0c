//! pdf-narrator: turn PDF documents into narrated audio plus transcripts,
//! and play the result back with seek, volume, and speed control.
//!
//! The crate is split along the two cores: [`pipeline`] converts (extraction
//! through [`extract`], synthesis through [`synth`], bundle placement and a
//! completion channel), and [`player`] drives playback. Everything else —
//! CLI parsing, logging, the update probe, the folder opener — is thin
//! orchestration around those two.

pub mod cli;
pub mod extract;
pub mod pipeline;
pub mod player;
pub mod synth;
pub mod update;
pub mod util;

pub use pipeline::{ConversionJob, ConversionOutcome, ConversionPipeline, Converter, OutputBundle};
pub use player::{PlaybackController, RodioEngine, TransportState};
