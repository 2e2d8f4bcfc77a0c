use std::{
    path::Path,
    sync::{mpsc::Sender, Arc},
    thread,
};

use log::{error, warn};
use walkdir::WalkDir;

use super::convert::{ConvertError, Converter};
use super::job::{has_pdf_extension, ConversionJob, ConversionOutcome};

/// Dispatches conversion jobs onto background workers and reports every
/// outcome over the caller's channel. The caller (the control thread) keeps
/// the receiving end and must drain one message per dispatched job.
pub struct ConversionPipeline {
    converter: Arc<Converter>,
}

impl ConversionPipeline {
    pub fn new(converter: Converter) -> Self {
        Self {
            converter: Arc::new(converter),
        }
    }

    /// Expand `source` into jobs and start one worker per job.
    ///
    /// A directory source expands to the `.pdf` files directly inside it
    /// (non-recursive); other files are ignored. Returns the number of
    /// dispatched jobs, or an error when the expansion itself fails —
    /// per-job failures are reported through the channel instead, so one
    /// broken file never aborts its siblings.
    pub fn dispatch(
        &self,
        source: &Path,
        output_root: &Path,
        events: Sender<ConversionOutcome>,
    ) -> Result<usize, ConvertError> {
        let jobs = expand_source(source, output_root)?;
        let count = jobs.len();

        for job in jobs {
            let converter = Arc::clone(&self.converter);
            let events = events.clone();
            thread::spawn(move || {
                let outcome = match converter.convert(&job) {
                    Ok(bundle) => ConversionOutcome::Completed {
                        source: job.source.clone(),
                        dir: bundle.dir,
                    },
                    Err(err) => {
                        error!("conversion of {} failed: {err}", job.source.display());
                        ConversionOutcome::Failed {
                            source: job.source.clone(),
                            message: err.to_string(),
                        }
                    }
                };
                if events.send(outcome).is_err() {
                    warn!(
                        "completion channel closed before {} reported",
                        job.source.display()
                    );
                }
            });
        }
        Ok(count)
    }
}

fn expand_source(source: &Path, output_root: &Path) -> Result<Vec<ConversionJob>, ConvertError> {
    if !source.exists() {
        return Err(ConvertError::MissingSource(source.to_path_buf()));
    }

    if source.is_dir() {
        let mut jobs = Vec::new();
        for entry in WalkDir::new(source)
            .max_depth(1)
            .into_iter()
            .filter_map(Result::ok)
        {
            if !entry.file_type().is_file() || !has_pdf_extension(entry.path()) {
                continue;
            }
            jobs.push(ConversionJob::new(
                entry.path().to_path_buf(),
                output_root.to_path_buf(),
            )?);
        }
        if jobs.is_empty() {
            return Err(ConvertError::NoInput(source.to_path_buf()));
        }
        // Deterministic dispatch order regardless of directory iteration.
        jobs.sort_by(|a, b| a.source.cmp(&b.source));
        Ok(jobs)
    } else {
        Ok(vec![ConversionJob::new(
            source.to_path_buf(),
            output_root.to_path_buf(),
        )?])
    }
}
