use std::{path::PathBuf, sync::Arc};

use log::info;
use thiserror::Error;

use crate::extract::{ExtractError, MupdfExtractor, TextExtractor};
use crate::synth::{PiperSynthesizer, SpeechSynthesizer, SynthError};

use super::job::{ConversionJob, OutputBundle};
use super::output::{discard_partial, reserve_bundle_dir, write_transcript};

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("source {0} does not exist")]
    MissingSource(PathBuf),
    #[error("{0} is not a PDF file")]
    NotPdf(PathBuf),
    #[error("no PDF files found in {0}")]
    NoInput(PathBuf),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Synth(#[from] SynthError),
    #[error("filesystem error at {path}: {source}")]
    Filesystem {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Converts one PDF at a time: extract text, synthesize narration, write the
/// transcript. Extraction and synthesis are injected so tests can run the
/// whole pipeline with scripted engines.
pub struct Converter {
    extractor: Arc<dyn TextExtractor + Send + Sync>,
    synthesizer: Arc<dyn SpeechSynthesizer + Send + Sync>,
}

impl Converter {
    pub fn new(
        extractor: Arc<dyn TextExtractor + Send + Sync>,
        synthesizer: Arc<dyn SpeechSynthesizer + Send + Sync>,
    ) -> Self {
        Self {
            extractor,
            synthesizer,
        }
    }

    /// MuPDF extraction plus a Piper engine resolved from the environment.
    pub fn with_defaults() -> Self {
        Self::new(
            Arc::new(MupdfExtractor),
            Arc::new(PiperSynthesizer::from_env()),
        )
    }

    /// Run one job to completion. On any failure after the bundle directory
    /// was reserved, the partial directory is removed before the error is
    /// returned, so a bundle directory on disk is always a whole bundle.
    pub fn convert(&self, job: &ConversionJob) -> Result<OutputBundle, ConvertError> {
        let base_name = job.base_name();
        let dir = reserve_bundle_dir(&job.output_root)?;
        info!(
            "converting {} into {}",
            job.source.display(),
            dir.display()
        );

        match self.fill_bundle(job, dir.clone(), &base_name) {
            Ok(bundle) => Ok(bundle),
            Err(err) => {
                discard_partial(&dir);
                Err(err)
            }
        }
    }

    fn fill_bundle(
        &self,
        job: &ConversionJob,
        dir: PathBuf,
        base_name: &str,
    ) -> Result<OutputBundle, ConvertError> {
        let pages = self.extractor.extract_pages(&job.source)?;
        let text = pages.concat();

        let audio = dir.join(format!("{base_name}.mp3"));
        self.synthesizer.synthesize(&text, &audio)?;

        let transcript = write_transcript(&dir, base_name, &text)?;

        Ok(OutputBundle {
            dir,
            audio,
            transcript,
            text,
        })
    }
}
