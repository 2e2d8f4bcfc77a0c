use std::{
    io::Write,
    path::{Path, PathBuf},
    process::{Command, Stdio},
    time::Instant,
};

use log::{error, info, warn};
use regex::Regex;
use shlex::Shlex;
use thiserror::Error;

/// Environment variable holding a full replacement command line for the
/// speech engine, e.g. `"python3 -m piper"`. Lexed with shell rules.
pub const TTS_COMMAND_ENV: &str = "NARRATOR_TTS_COMMAND";
/// Environment variable pointing at the voice model passed via `--model`.
pub const VOICE_MODEL_ENV: &str = "NARRATOR_VOICE_MODEL";

#[derive(Debug, Error)]
pub enum SynthError {
    #[error("voice model not found at {0}")]
    VoiceNotFound(PathBuf),
    #[error("failed to spawn speech engine: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("speech engine exited with status {status}: {stderr}")]
    EngineFailure { status: i32, stderr: String },
    #[error("{0}")]
    Other(String),
}

/// Synthesis seam used by the conversion pipeline.
///
/// Implementations block until the engine has finished writing `output`.
pub trait SpeechSynthesizer {
    fn synthesize(&self, text: &str, output: &Path) -> Result<(), SynthError>;
}

/// Collapse the extracted text into one continuous utterance for the engine.
///
/// PDF extraction leaves hard line breaks and page boundaries in the text;
/// the transcript keeps them, the narration does not.
pub fn prepare_text(text: &str) -> String {
    let whitespace = Regex::new(r"\s+").unwrap();
    whitespace.replace_all(text, " ").trim().to_string()
}

/// Piper-backed synthesizer. The command line is taken from
/// [`TTS_COMMAND_ENV`] when set, otherwise `piper` is expected on PATH.
pub struct PiperSynthesizer {
    command: Option<String>,
    model: Option<PathBuf>,
}

impl PiperSynthesizer {
    pub fn new(command: Option<String>, model: Option<PathBuf>) -> Self {
        Self { command, model }
    }

    pub fn from_env() -> Self {
        Self {
            command: std::env::var(TTS_COMMAND_ENV).ok(),
            model: std::env::var_os(VOICE_MODEL_ENV).map(PathBuf::from),
        }
    }

    fn build_command(&self) -> Result<Command, SynthError> {
        let mut command = match &self.command {
            Some(raw) => {
                let mut parts: Vec<String> = Shlex::new(raw).collect();
                if parts.is_empty() {
                    return Err(SynthError::Other(format!("{TTS_COMMAND_ENV} is empty")));
                }
                let program = parts.remove(0);
                let mut command = Command::new(program);
                command.args(parts);
                command
            }
            None => Command::new("piper"),
        };

        if let Some(model) = &self.model {
            if !model.exists() {
                return Err(SynthError::VoiceNotFound(model.clone()));
            }
            command.arg("--model");
            command.arg(model);
        }
        Ok(command)
    }
}

impl SpeechSynthesizer for PiperSynthesizer {
    fn synthesize(&self, text: &str, output: &Path) -> Result<(), SynthError> {
        let start = Instant::now();
        let mut command = self.build_command()?;
        command.arg("--output_file");
        command.arg(output);

        let mut child = command
            .stdin(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(SynthError::Spawn)?;
        {
            let stdin = child
                .stdin
                .as_mut()
                .ok_or_else(|| SynthError::Other("failed to access engine stdin".into()))?;
            stdin
                .write_all(prepare_text(text).as_bytes())
                .map_err(|err| SynthError::Other(err.to_string()))?;
        }
        let result = child
            .wait_with_output()
            .map_err(|err| SynthError::Other(err.to_string()))?;
        let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();

        if !result.status.success() {
            let status = result.status.code().unwrap_or_default();
            error!("speech engine exited with status {status}: {stderr}");
            return Err(SynthError::EngineFailure { status, stderr });
        }

        if !output.exists() {
            warn!(
                "speech engine succeeded but the expected output {} was not created",
                output.display()
            );
        }

        info!(
            "synthesized {} in {}ms",
            output.display(),
            start.elapsed().as_millis()
        );
        Ok(())
    }
}
