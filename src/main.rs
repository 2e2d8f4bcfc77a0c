use std::{
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
    sync::mpsc,
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};

use pdf_narrator::cli::{Cli, Command};
use pdf_narrator::pipeline::{ConversionOutcome, ConversionPipeline, Converter};
use pdf_narrator::player::{PlaybackController, RodioEngine, SEEK_STEP_SECS};
use pdf_narrator::{update, util};

fn main() -> Result<()> {
    let cli = Cli::parse();
    util::logging::init().context("failed to initialise logging")?;

    if let Some(tag) = update::check_latest() {
        info!("a newer release ({tag}) is available");
    }

    match cli.command {
        Command::Convert {
            source,
            out,
            reveal,
            json,
            play,
        } => run_convert(&source, out, reveal, json, play),
        Command::Play { audio } => run_play(&audio),
    }
}

fn run_convert(
    source: &Path,
    out: Option<PathBuf>,
    reveal: bool,
    json: bool,
    play: bool,
) -> Result<()> {
    let output_root = Command::resolve_output_root(source, out);
    let pipeline = ConversionPipeline::new(Converter::with_defaults());

    let (events_tx, events_rx) = mpsc::channel();
    let dispatched = pipeline
        .dispatch(source, &output_root, events_tx)
        .with_context(|| format!("cannot convert {}", source.display()))?;
    info!("dispatched {dispatched} conversion job(s)");

    let mut first_bundle: Option<PathBuf> = None;
    let mut failures = 0usize;
    for _ in 0..dispatched {
        let outcome = events_rx
            .recv()
            .context("conversion workers stopped reporting")?;
        if json {
            println!("{}", serde_json::to_string(&outcome)?);
        }
        match &outcome {
            ConversionOutcome::Completed { source, dir } => {
                if !json {
                    println!("Converted {} -> {}", source.display(), dir.display());
                }
                if first_bundle.is_none() {
                    first_bundle = Some(dir.clone());
                }
            }
            ConversionOutcome::Failed { source, message } => {
                if !json {
                    println!("Failed {}: {message}", source.display());
                }
                failures += 1;
            }
        }
    }

    if let Some(dir) = &first_bundle {
        if reveal {
            util::reveal::open_in_file_manager(dir);
        }
        if play {
            if let Some(audio) = find_audio_artifact(dir) {
                return run_play(&audio);
            }
            warn!("no audio artifact found in {}", dir.display());
        }
    }

    if failures == dispatched {
        bail!("all {dispatched} conversion job(s) failed");
    }
    Ok(())
}

fn find_audio_artifact(dir: &Path) -> Option<PathBuf> {
    std::fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .find(|path| path.extension().and_then(|ext| ext.to_str()) == Some("mp3"))
}

/// Minimal transport prompt over the playback controller. One command per
/// line; the controller itself enforces every transport rule.
fn run_play(audio: &Path) -> Result<()> {
    let mut controller = PlaybackController::with_resource(RodioEngine::new(), audio)
        .map_err(|err| anyhow::anyhow!("cannot load {}: {err}", audio.display()))?;

    println!("Loaded {}", audio.display());
    println!(
        "Commands: p = play/pause, r = restart, f/b = seek ±{SEEK_STEP_SECS}s, \
         v <0-100> = volume, s <50-200> = rate, q = quit"
    );

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read transport command")?;
        let mut parts = line.split_whitespace();
        let result = match (parts.next(), parts.next()) {
            (Some("p"), _) => controller.toggle().map(|_| ()),
            (Some("r"), _) => controller.restart().map(|_| ()),
            (Some("f"), _) => controller.seek(SEEK_STEP_SECS).map(|_| ()),
            (Some("b"), _) => controller.seek(-SEEK_STEP_SECS).map(|_| ()),
            (Some("v"), Some(value)) => match value.parse::<u8>() {
                Ok(volume) => {
                    controller.set_volume(volume);
                    Ok(())
                }
                Err(_) => {
                    println!("volume must be 0-100");
                    Ok(())
                }
            },
            (Some("s"), Some(value)) => match value.parse::<u16>() {
                Ok(control) => {
                    controller.set_rate(control);
                    Ok(())
                }
                Err(_) => {
                    println!("rate must be 50-200");
                    Ok(())
                }
            },
            (Some("q"), _) => break,
            (None, _) => Ok(()),
            _ => {
                println!("unknown command: {line}");
                Ok(())
            }
        };
        if let Err(err) = result {
            println!("{err}");
        }
        print!("[{}] > ", controller.toggle_label());
        io::stdout().flush().ok();
    }

    controller.close();
    Ok(())
}
